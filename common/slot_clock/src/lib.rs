//! Wall-clock slot timing, grounded on the real-time half of the teacher's
//! `ManualSlotClock` (`common/slot_clock`): a genesis instant plus a fixed
//! slot duration, with slot/epoch arithmetic delegated to `attacker_types`.
//! The delay actions in C5 (`delayToNextSlot`, `delayToEpochEnd`, ...) are
//! the main consumer — they need "how long until X" against a clock that
//! can also be frozen for deterministic tests.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait SlotClock: Send + Sync {
    fn now(&self) -> Option<u64>;
    fn now_duration(&self) -> Duration;
    fn slot_duration(&self) -> Duration;
    fn start_of(&self, slot: u64) -> Duration;
    fn duration_to_slot(&self, slot: u64) -> Option<Duration> {
        self.start_of(slot).checked_sub(self.now_duration())
    }
    fn duration_to_next_slot(&self) -> Option<Duration> {
        let next = self.now()?.saturating_add(1);
        self.duration_to_slot(next)
    }
}

/// Slot clock backed by the OS clock — what the running service uses.
#[derive(Debug, Clone)]
pub struct SystemTimeSlotClock {
    genesis_duration: Duration,
    slot_duration: Duration,
}

impl SystemTimeSlotClock {
    pub fn new(genesis_duration: Duration, slot_duration: Duration) -> Self {
        SystemTimeSlotClock {
            genesis_duration,
            slot_duration,
        }
    }
}

impl SlotClock for SystemTimeSlotClock {
    fn now(&self) -> Option<u64> {
        let now = self.now_duration();
        let since_genesis = now.checked_sub(self.genesis_duration)?;
        Some((since_genesis.as_millis() / self.slot_duration.as_millis()) as u64)
    }

    fn now_duration(&self) -> Duration {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
    }

    fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    fn start_of(&self, slot: u64) -> Duration {
        self.genesis_duration + self.slot_duration * slot as u32
    }
}

/// A clock whose "now" is set explicitly, for deterministic tests of
/// delay-action scheduling.
#[derive(Debug, Clone)]
pub struct ManualSlotClock {
    genesis_duration: Duration,
    slot_duration: Duration,
    current: Arc<RwLock<Duration>>,
}

impl ManualSlotClock {
    pub fn new(genesis_duration: Duration, slot_duration: Duration) -> Self {
        ManualSlotClock {
            genesis_duration,
            slot_duration,
            current: Arc::new(RwLock::new(genesis_duration)),
        }
    }

    pub fn set_slot(&self, slot: u64) {
        *self.current.write() = self.start_of(slot);
    }

    pub fn set_current_time(&self, duration: Duration) {
        *self.current.write() = duration;
    }
}

impl SlotClock for ManualSlotClock {
    fn now(&self) -> Option<u64> {
        let since_genesis = self.now_duration().checked_sub(self.genesis_duration)?;
        Some((since_genesis.as_millis() / self.slot_duration.as_millis()) as u64)
    }

    fn now_duration(&self) -> Duration {
        *self.current.read()
    }

    fn slot_duration(&self) -> Duration {
        self.slot_duration
    }

    fn start_of(&self, slot: u64) -> Duration {
        self.genesis_duration + self.slot_duration * slot as u32
    }
}
