//! Wire shapes for the standard Ethereum beacon-node REST API, trimmed to
//! the handful of fields this service reads. Grounded on
//! `beaconapi/beaconclient.go`'s `types.BeaconResponse` / `ProposerDuty` /
//! `BeaconHeaderInfo` / `SlotStateRoot`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct BeaconResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProposerDuty {
    pub slot: String,
    pub validator_index: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotStateRoot {
    pub root: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeaconBlockHeaderMessage {
    pub slot: String,
    pub proposer_index: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeaconBlockHeaderEnvelope {
    pub message: BeaconBlockHeaderMessage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeaconHeaderInfo {
    pub header: BeaconBlockHeaderEnvelope,
}

/// `chain_reorg` SSE event body, per the standard beacon-node events API.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainReorgEvent {
    pub slot: String,
    pub depth: String,
    pub old_head_block: String,
    pub new_head_block: String,
    pub old_head_state: String,
    pub new_head_state: String,
    pub epoch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttestDuty {
    pub pubkey: String,
    pub validator_index: String,
}

/// A single validator's attestation-reward row from
/// `/eth/v1/beacon/rewards/attestations/:epoch`, grounded on `reward.go`'s
/// use of `totalReward.{Head,Target}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TotalReward {
    pub validator_index: String,
    pub head: String,
    pub target: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardInfo {
    pub total_rewards: Vec<TotalReward>,
}
