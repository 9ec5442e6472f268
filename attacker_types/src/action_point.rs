//! The closed set of hook action points (component C10), grounded on
//! `original_source/types/actionpoint.go`'s `allActionPoints`/
//! `CheckActionPointExist`. The core's six lifecycle stages (before/after
//! broadcast, sign, propose) appear for both `attest.*` and `block.*`,
//! plus one block-only point for delaying receipt of an incoming block:
//! exactly the 13 names `ParseToInternalSlotStrategy` validates a strategy
//! document against. `block.BroadCastDelay`/`block.GetNewParentRoot` are
//! real RPC methods (see `rpc_server`) but are not driven by this table:
//! the original wires their lookups to action-point names outside this
//! closed set, so they can never be configured by a valid strategy and
//! always pass their payload through unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionPoint {
    AttestBeforeBroadCast,
    AttestAfterBroadCast,
    AttestBeforeSign,
    AttestAfterSign,
    AttestBeforePropose,
    AttestAfterPropose,
    BlockDelayForReceiveBlock,
    BlockBeforeBroadCast,
    BlockAfterBroadCast,
    BlockBeforeSign,
    BlockAfterSign,
    BlockBeforePropose,
    BlockAfterPropose,
}

pub const ALL_ACTION_POINTS: [ActionPoint; 13] = [
    ActionPoint::AttestBeforeBroadCast,
    ActionPoint::AttestAfterBroadCast,
    ActionPoint::AttestBeforeSign,
    ActionPoint::AttestAfterSign,
    ActionPoint::AttestBeforePropose,
    ActionPoint::AttestAfterPropose,
    ActionPoint::BlockDelayForReceiveBlock,
    ActionPoint::BlockBeforeBroadCast,
    ActionPoint::BlockAfterBroadCast,
    ActionPoint::BlockBeforeSign,
    ActionPoint::BlockAfterSign,
    ActionPoint::BlockBeforePropose,
    ActionPoint::BlockAfterPropose,
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("action point {0} does not exist")]
pub struct UnknownActionPoint(pub String);

impl ActionPoint {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionPoint::AttestBeforeBroadCast => "AttestBeforeBroadCast",
            ActionPoint::AttestAfterBroadCast => "AttestAfterBroadCast",
            ActionPoint::AttestBeforeSign => "AttestBeforeSign",
            ActionPoint::AttestAfterSign => "AttestAfterSign",
            ActionPoint::AttestBeforePropose => "AttestBeforePropose",
            ActionPoint::AttestAfterPropose => "AttestAfterPropose",
            ActionPoint::BlockDelayForReceiveBlock => "BlockDelayForReceiveBlock",
            ActionPoint::BlockBeforeBroadCast => "BlockBeforeBroadCast",
            ActionPoint::BlockAfterBroadCast => "BlockAfterBroadCast",
            ActionPoint::BlockBeforeSign => "BlockBeforeSign",
            ActionPoint::BlockAfterSign => "BlockAfterSign",
            ActionPoint::BlockBeforePropose => "BlockBeforePropose",
            ActionPoint::BlockAfterPropose => "BlockAfterPropose",
        }
    }

    /// `true` for the six `attest.*` action points; `false` for `block.*`.
    pub fn is_attestation_point(self) -> bool {
        self.as_str().starts_with("Attest")
    }
}

impl FromStr for ActionPoint {
    type Err = UnknownActionPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ACTION_POINTS
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownActionPoint(s.to_string()))
    }
}

impl fmt::Display for ActionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_13_points_round_trip() {
        assert_eq!(ALL_ACTION_POINTS.len(), 13);
        for point in ALL_ACTION_POINTS {
            let parsed: ActionPoint = point.as_str().parse().unwrap();
            assert_eq!(parsed, point);
        }
    }

    #[test]
    fn unknown_point_rejected() {
        assert!("NoSuchPoint".parse::<ActionPoint>().is_err());
    }

    #[test]
    fn attest_vs_block_classification() {
        assert!(ActionPoint::AttestBeforeSign.is_attestation_point());
        assert!(!ActionPoint::BlockBeforeSign.is_attestation_point());
    }
}
