//! Proposer duty as reported by the beacon gateway's duties endpoint,
//! trimmed to the fields the strategy/role-resolver layers need.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeDuty {
    pub slot: u64,
    pub validator_index: i64,
}

impl ProposeDuty {
    pub fn new(slot: u64, validator_index: i64) -> Self {
        ProposeDuty { slot, validator_index }
    }
}
