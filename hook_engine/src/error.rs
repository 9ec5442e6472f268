//! Internal error kinds for action execution (spec.md §7). None of these
//! ever reach an RPC caller: `Dispatcher::dispatch` logs them and degrades
//! to a pass-through `Null` response, per the propagation policy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("block artifact: {0}")]
    Block(#[from] crate::block::BlockError),
    #[error("attestation artifact: {0}")]
    Attestation(#[from] aggregation::DecodeError),
    #[error("no cached slot-start time for slot {0}")]
    NoSlotStart(u64),
}
