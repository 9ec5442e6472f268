//! Route composition for the REST side channel (spec.md §6). Grounded on
//! the teacher's `validator_client/http_api` filter style (`ptc_duties.rs`:
//! a `warp::path!` filter, state injected via `and(with_state(...))`, body
//! parsed with `warp::body::json()`, dispatched into an `and_then` handler).

use crate::handlers;
use attacker_store::Store;
use beacon_client::BeaconClient;
use hook_engine::Engine;
use std::convert::Infallible;
use strategy::StrategyFile;
use warp::{Filter, Rejection, Reply};

fn with_engine(engine: Engine) -> impl Filter<Extract = (Engine,), Error = Infallible> + Clone {
    warp::any().map(move || engine.clone())
}

fn with_store(store: Option<Store>) -> impl Filter<Extract = (Option<Store>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_beacon(client: BeaconClient) -> impl Filter<Extract = (BeaconClient,), Error = Infallible> + Clone {
    warp::any().map(move || client.clone())
}

pub fn routes(
    engine: Engine,
    store: Option<Store>,
    beacon: BeaconClient,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let duties = warp::path!("v1" / "duties" / i64)
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(handlers::duties);

    let strategy_get = warp::path!("v1" / "strategy")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(handlers::strategy_snapshot);

    let strategy_update = warp::path!("v1" / "update-strategy")
        .and(warp::post())
        .and(warp::body::json::<StrategyFile>())
        .and(with_engine(engine.clone()))
        .and_then(handlers::update_strategy);

    let reward = warp::path!("v1" / "reward" / i64)
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::reward);

    let reorgs = warp::path!("v1" / "reorgs")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::reorgs);

    let block = warp::path!("v1" / "block" / u64)
        .and(warp::get())
        .and(with_beacon(beacon.clone()))
        .and_then(handlers::block_by_slot);

    let epoch = warp::path!("v1" / "epoch")
        .and(warp::get())
        .and(with_engine(engine.clone()))
        .and_then(handlers::current_epoch);

    let slot = warp::path!("v1" / "slot")
        .and(warp::get())
        .and(with_engine(engine))
        .and_then(handlers::current_slot);

    let metrics = warp::path!("metrics").and(warp::get()).and_then(handlers::metrics_text);

    duties
        .or(strategy_get)
        .or(strategy_update)
        .or(reward)
        .or(reorgs)
        .or(block)
        .or(epoch)
        .or(slot)
        .or(metrics)
        .recover(handlers::handle_rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_cache::ArtifactCache;
    use sensitive_url::SensitiveUrl;
    use slot_clock::ManualSlotClock;
    use std::sync::Arc;
    use std::time::Duration;
    use task_executor::TaskExecutor;

    fn test_engine() -> Engine {
        let clock = Arc::new(ManualSlotClock::new(Duration::from_secs(0), Duration::from_secs(12)));
        let (_tx, rx) = task_executor::shutdown_channel();
        let handle = tokio::runtime::Handle::current();
        Engine::new(Arc::new(ArtifactCache::new()), clock, TaskExecutor::new(handle, rx), 32, 12, 128)
    }

    fn test_beacon() -> BeaconClient {
        BeaconClient::new(SensitiveUrl::parse("http://localhost:5052").unwrap())
    }

    #[tokio::test]
    async fn strategy_snapshot_defaults_to_empty() {
        let filter = routes(test_engine(), None, test_beacon());
        let resp = warp::test::request().method("GET").path("/v1/strategy").reply(&filter).await;
        assert_eq!(resp.status(), 200);
        let body: StrategyFile = serde_json::from_slice(resp.body()).unwrap();
        assert!(body.slots.is_empty());
    }

    #[tokio::test]
    async fn slot_defaults_to_zero_with_no_observed_traffic() {
        let filter = routes(test_engine(), None, test_beacon());
        let resp = warp::test::request().method("GET").path("/v1/slot").reply(&filter).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), "{\"slot\":0}");
    }

    #[tokio::test]
    async fn reward_with_no_store_returns_empty_array() {
        let filter = routes(test_engine(), None, test_beacon());
        let resp = warp::test::request().method("GET").path("/v1/reward/5").reply(&filter).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), "[]");
    }

    #[tokio::test]
    async fn update_strategy_with_unknown_action_name_is_a_server_error() {
        let filter = routes(test_engine(), None, test_beacon());
        let bad = serde_json::json!({
            "slots": [{"slot": "every", "level": 0, "actions": {"AttestBeforeSign": "not_a_real_action"}}]
        });
        let resp = warp::test::request()
            .method("POST")
            .path("/v1/update-strategy")
            .json(&bad)
            .reply(&filter)
            .await;
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn metrics_endpoint_is_plain_text() {
        let filter = routes(test_engine(), None, test_beacon());
        let resp = warp::test::request().method("GET").path("/metrics").reply(&filter).await;
        assert_eq!(resp.status(), 200);
    }
}
