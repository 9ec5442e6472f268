//! Pure slot/epoch arithmetic (component C1).
//!
//! `Slot` and `Epoch` are thin newtypes over `u64` so that callers cannot
//! accidentally mix the two units. All functions here are total over
//! non-negative inputs; there is no notion of a negative slot.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Slot {
    pub fn new(slot: u64) -> Self {
        Slot(slot)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// `slot_to_epoch(s) = floor(s / slots_per_epoch)`.
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch(self.0 / slots_per_epoch)
    }

    pub fn saturating_add(self, n: u64) -> Self {
        Slot(self.0.saturating_add(n))
    }

    pub fn saturating_sub(self, n: u64) -> Self {
        Slot(self.0.saturating_sub(n))
    }
}

impl Epoch {
    pub fn new(epoch: u64) -> Self {
        Epoch(epoch)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// `epoch_start(e) = e * slots_per_epoch`.
    pub fn start_slot(self, slots_per_epoch: u64) -> Slot {
        Slot(self.0 * slots_per_epoch)
    }

    /// `epoch_end(e) = (e + 1) * slots_per_epoch - 1`.
    pub fn end_slot(self, slots_per_epoch: u64) -> Slot {
        Slot((self.0 + 1) * slots_per_epoch - 1)
    }

    pub fn saturating_add(self, n: u64) -> Self {
        Epoch(self.0.saturating_add(n))
    }
}

impl From<u64> for Slot {
    fn from(v: u64) -> Self {
        Slot(v)
    }
}

impl From<u64> for Epoch {
    fn from(v: u64) -> Self {
        Epoch(v)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free functions mirroring `spec.md` §4.1 naming, for call sites that deal
/// in raw `i64`/`u64` slots rather than the newtypes (e.g. the strategy DSL,
/// which parses slot predicates out of JSON strings).
pub fn slot_to_epoch(slot: i64, slots_per_epoch: i64) -> i64 {
    slot / slots_per_epoch
}

pub fn epoch_start(epoch: i64, slots_per_epoch: i64) -> i64 {
    epoch * slots_per_epoch
}

pub fn epoch_end(epoch: i64, slots_per_epoch: i64) -> i64 {
    (epoch + 1) * slots_per_epoch - 1
}
