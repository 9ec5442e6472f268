//! Handlers for the REST side channel (spec.md §6). Each endpoint is a
//! thin read/write over `hook_engine::Engine`, the optional
//! `attacker_store::Store`, and the beacon gateway client — no logic lives
//! here beyond shaping the response, mirroring how `ptc_duties`-style
//! handlers in the teacher's `http_api` stay a thin layer over `BeaconChain`.

use attacker_store::{BlockReward, ChainReorg, Store};
use beacon_client::BeaconClient;
use hook_engine::Engine;
use serde_json::json;
use strategy::{SlotContext, StrategyError, StrategyFile};
use warp::http::StatusCode;
use warp::{reject, reply, Rejection, Reply};

#[derive(Debug)]
pub struct BadStrategy(pub StrategyError);
impl reject::Reject for BadStrategy {}

#[derive(Debug)]
pub struct StoreUnavailable(pub attacker_store::StoreError);
impl reject::Reject for StoreUnavailable {}

#[derive(Debug)]
pub struct BeaconUnavailable(pub beacon_client::BeaconClientError);
impl reject::Reject for BeaconUnavailable {}

pub async fn duties(epoch: i64, engine: Engine) -> Result<impl Reply, Rejection> {
    Ok(reply::json(&engine.propose_duties(epoch)))
}

pub async fn strategy_snapshot(engine: Engine) -> Result<impl Reply, Rejection> {
    Ok(reply::json(&engine.strategy_snapshot()))
}

pub async fn update_strategy(file: StrategyFile, engine: Engine) -> Result<impl Reply, Rejection> {
    engine.update_strategy(file).map_err(|err| reject::custom(BadStrategy(err)))?;
    Ok(reply::with_status(reply::json(&json!({"status": "ok"})), StatusCode::OK))
}

pub async fn reward(epoch: i64, store: Option<Store>) -> Result<impl Reply, Rejection> {
    match store {
        Some(store) => {
            let rows = store.rewards_by_epoch(epoch).await.map_err(|err| reject::custom(StoreUnavailable(err)))?;
            Ok(reply::json(&rows))
        }
        None => Ok(reply::json(&Vec::<BlockReward>::new())),
    }
}

pub async fn reorgs(store: Option<Store>) -> Result<impl Reply, Rejection> {
    match store {
        Some(store) => {
            let rows = store.all_reorgs().await.map_err(|err| reject::custom(StoreUnavailable(err)))?;
            Ok(reply::json(&rows))
        }
        None => Ok(reply::json(&Vec::<ChainReorg>::new())),
    }
}

pub async fn block_by_slot(slot: u64, client: BeaconClient) -> Result<impl Reply, Rejection> {
    let header = client
        .header_by_id(&slot.to_string())
        .await
        .map_err(|err| reject::custom(BeaconUnavailable(err)))?;
    Ok(reply::json(&header))
}

pub async fn current_epoch(engine: Engine) -> Result<impl Reply, Rejection> {
    let slot = engine.latest_observed_slot().unwrap_or(0) as i64;
    let epoch = attacker_types::slot_to_epoch(slot, engine.slots_per_epoch);
    Ok(reply::json(&json!({ "epoch": epoch })))
}

pub async fn current_slot(engine: Engine) -> Result<impl Reply, Rejection> {
    let slot = engine.latest_observed_slot().unwrap_or(0);
    Ok(reply::json(&json!({ "slot": slot })))
}

pub async fn metrics_text() -> Result<impl Reply, Rejection> {
    Ok(reply::with_header(metrics::gather_text(), "content-type", "text/plain; version=0.0.4"))
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, message) = if let Some(BadStrategy(e)) = err.find() {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    } else if let Some(StoreUnavailable(e)) = err.find() {
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
    } else if let Some(BeaconUnavailable(e)) = err.find() {
        (StatusCode::BAD_GATEWAY, e.to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };
    Ok(reply::with_status(reply::json(&json!({ "error": message })), status))
}
