//! REST client for the consumed beacon-node gateway. Grounded on
//! `beaconapi/beaconclient.go`'s `BeaconGwClient`: same endpoints, same
//! one-shot config cache, swapped from `httplib` to `reqwest`.

use crate::types::{
    AttestDuty, BeaconHeaderInfo, BeaconResponse, ChainReorgEvent, ProposerDuty, RewardInfo, SlotStateRoot,
    TotalReward,
};
use attacker_types::ProposeDuty;
use futures::Stream;
use reqwest_eventsource::{Event, EventSource};
use sensitive_url::SensitiveUrl;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const SLOTS_PER_EPOCH_KEY: &str = "SLOTS_PER_EPOCH";
pub const SECONDS_PER_SLOT_KEY: &str = "SECONDS_PER_SLOT";

#[derive(Debug, thiserror::Error)]
pub enum BeaconClientError {
    #[error("invalid beacon gateway path: {0}")]
    Url(#[from] sensitive_url::SensitiveUrlError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected beacon gateway response shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("beacon gateway returned no headers")]
    NoHeaders,
}

#[derive(Clone)]
pub struct BeaconClient {
    http: reqwest::Client,
    base: Arc<SensitiveUrl>,
    config_cache: Arc<RwLock<Option<HashMap<String, String>>>>,
}

impl BeaconClient {
    pub fn new(base: SensitiveUrl) -> Self {
        BeaconClient {
            http: reqwest::Client::new(),
            base: Arc::new(base),
            config_cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn get<T: for<'de> serde::Deserialize<'de>>(&self, path: &str) -> Result<T, BeaconClientError> {
        let url = self.base.join(path)?;
        let body = self.http.get(url).send().await?.bytes().await?;
        let response: BeaconResponse<T> = serde_json::from_slice(&body)?;
        Ok(response.data)
    }

    /// `/eth/v1/config/spec`, cached for the client's lifetime (the Go
    /// client's `GetBeaconConfig` memoization).
    pub async fn spec_config(&self) -> Result<HashMap<String, String>, BeaconClientError> {
        if let Some(cached) = self.config_cache.read().await.clone() {
            return Ok(cached);
        }
        let config: HashMap<String, String> = self.get("eth/v1/config/spec").await?;
        *self.config_cache.write().await = Some(config.clone());
        Ok(config)
    }

    pub async fn latest_header(&self) -> Result<BeaconHeaderInfo, BeaconClientError> {
        let headers: Vec<BeaconHeaderInfo> = self.get("eth/v1/beacon/headers").await?;
        headers.into_iter().next().ok_or(BeaconClientError::NoHeaders)
    }

    /// `/eth/v1/beacon/headers/:block_id`, for resolving a reorg event's
    /// `old_head_block`/`new_head_block` to a slot and proposer.
    pub async fn header_by_id(&self, block_id: &str) -> Result<BeaconHeaderInfo, BeaconClientError> {
        self.get(&format!("eth/v1/beacon/headers/{block_id}")).await
    }

    /// A named config value from `/eth/v1/config/spec`, parsed as an int.
    /// Returns `None` when the gateway doesn't carry the key, matching the
    /// Go client's "missing key is zero" convention.
    pub async fn int_config(&self, key: &str) -> Result<Option<u64>, BeaconClientError> {
        let config = self.spec_config().await?;
        Ok(match config.get(key) {
            Some(v) => Some(v.parse().unwrap_or(0)),
            None => None,
        })
    }

    pub async fn current_epoch(&self, slots_per_epoch: u64) -> Result<u64, BeaconClientError> {
        let header = self.latest_header().await?;
        let slot: u64 = header.header.message.slot.parse().unwrap_or(0);
        Ok(slot / slots_per_epoch.max(1))
    }

    /// `POST /eth/v1/validator/duties/attester/:epoch`, grounded on
    /// `GetAttesterDuties`. Returns `(validator_index, pubkey)` pairs.
    pub async fn attester_duties(&self, epoch: u64, validator_indices: &[i64]) -> Result<Vec<(i64, String)>, BeaconClientError> {
        let url = self.base.join(&format!("eth/v1/validator/duties/attester/{epoch}"))?;
        let body: Vec<String> = validator_indices.iter().map(ToString::to_string).collect();
        let raw = self.http.post(url).json(&body).send().await?.bytes().await?;
        let response: BeaconResponse<Vec<AttestDuty>> = serde_json::from_slice(&raw)?;
        Ok(response
            .data
            .into_iter()
            .filter_map(|d| Some((d.validator_index.parse().ok()?, d.pubkey)))
            .collect())
    }

    /// `POST /eth/v1/beacon/rewards/attestations/:epoch`, grounded on
    /// `GetAllValReward` (an empty-array body requests every validator).
    pub async fn all_validator_rewards(&self, epoch: u64) -> Result<Vec<TotalReward>, BeaconClientError> {
        let url = self.base.join(&format!("eth/v1/beacon/rewards/attestations/{epoch}"))?;
        let raw = self.http.post(url).json::<[&str; 0]>(&[]).send().await?.bytes().await?;
        let response: BeaconResponse<RewardInfo> = serde_json::from_slice(&raw)?;
        Ok(response.data.total_rewards)
    }

    pub async fn proposer_duties(&self, epoch: u64) -> Result<Vec<ProposeDuty>, BeaconClientError> {
        let duties: Vec<ProposerDuty> = self.get(&format!("eth/v1/validator/duties/proposer/{epoch}")).await?;
        Ok(duties
            .into_iter()
            .filter_map(|d| {
                let slot = d.slot.parse().ok()?;
                let validator_index = d.validator_index.parse().ok()?;
                Some(ProposeDuty::new(slot, validator_index))
            })
            .collect())
    }

    pub async fn slot_root(&self, slot: u64) -> Result<String, BeaconClientError> {
        let root: SlotStateRoot = self.get(&format!("eth/v1/beacon/states/{slot}/root")).await?;
        Ok(root.root)
    }

    /// Subscribes to `chain_reorg` server-sent events. Grounded on
    /// `MonitorReorgEvent`, which forwards decoded events over a channel;
    /// here the channel is a `Stream` the caller polls directly.
    pub fn subscribe_reorgs(&self) -> impl Stream<Item = Result<ChainReorgEvent, BeaconClientError>> + Send + 'static {
        use futures::StreamExt;

        let url = self
            .base
            .join("eth/v1/events?topics=chain_reorg")
            .expect("reorg events path is a valid relative url");
        let source = EventSource::get(url);
        source.filter_map(|event| async move {
            match event {
                Ok(Event::Message(msg)) => Some(
                    serde_json::from_str::<ChainReorgEvent>(&msg.data).map_err(BeaconClientError::from),
                ),
                Ok(Event::Open) => None,
                Err(err) => {
                    tracing::warn!(error = %err, "reorg event stream error");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_client_from_a_base_url() {
        let base = SensitiveUrl::parse("http://localhost:5052/").unwrap();
        let _client = BeaconClient::new(base);
    }
}
