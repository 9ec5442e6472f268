mod client;
mod types;

pub use client::{BeaconClient, BeaconClientError, SECONDS_PER_SLOT_KEY, SLOTS_PER_EPOCH_KEY};
pub use types::{
    AttestDuty, BeaconBlockHeaderEnvelope, BeaconBlockHeaderMessage, BeaconHeaderInfo, BeaconResponse,
    ChainReorgEvent, ProposerDuty, RewardInfo, SlotStateRoot, TotalReward,
};
