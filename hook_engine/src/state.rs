//! The process-wide service state (spec.md §9 design note: "replace the
//! module-global with a process-wide state object constructed at startup
//! and passed explicitly"). `Engine` is that object: every field the
//! dispatcher and the C9 monitors share lives here, each behind its own
//! lock so a strategy reload never blocks an in-flight hook call on an
//! unrelated field.

use artifact_cache::ArtifactCache;
use attacker_types::{ProposeDuty, RoleType};
use parking_lot::RwLock;
use slot_clock::SlotClock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strategy::{SlotContext, StrategyError, StrategyFile, StrategyTable};
use task_executor::TaskExecutor;

struct StrategyState {
    file: StrategyFile,
    table: StrategyTable,
}

/// Shared, cloneable handle (all fields are `Arc`-backed) to the running
/// service's state: the hot-swappable strategy, the artifact cache, the
/// duty roster, per-validator role overrides (`admin.SetRole*`), and the
/// recorded slot-start times `BlockDelayForReceiveBlock` needs.
#[derive(Clone)]
pub struct Engine {
    strategy: Arc<RwLock<StrategyState>>,
    cache: Arc<ArtifactCache>,
    duties: Arc<RwLock<HashMap<i64, Vec<ProposeDuty>>>>,
    role_overrides: Arc<RwLock<HashMap<i64, RoleType>>>,
    slot_starts: Arc<RwLock<HashMap<u64, Duration>>>,
    clock: Arc<dyn SlotClock>,
    executor: TaskExecutor,
    pub slots_per_epoch: i64,
    pub seconds_per_slot: u64,
    pub max_attestations_per_block: usize,
}

impl Engine {
    pub fn new(
        cache: Arc<ArtifactCache>,
        clock: Arc<dyn SlotClock>,
        executor: TaskExecutor,
        slots_per_epoch: i64,
        seconds_per_slot: u64,
        max_attestations_per_block: usize,
    ) -> Self {
        Engine {
            strategy: Arc::new(RwLock::new(StrategyState {
                file: StrategyFile::default(),
                table: StrategyTable::default(),
            })),
            cache,
            duties: Arc::new(RwLock::new(HashMap::new())),
            role_overrides: Arc::new(RwLock::new(HashMap::new())),
            slot_starts: Arc::new(RwLock::new(HashMap::new())),
            clock,
            executor,
            slots_per_epoch,
            seconds_per_slot,
            max_attestations_per_block,
        }
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    pub fn clock(&self) -> &dyn SlotClock {
        self.clock.as_ref()
    }

    pub fn executor(&self) -> &TaskExecutor {
        &self.executor
    }

    /// Parses and compiles `raw`, swapping it in only on success — the
    /// prior strategy stays live on a parse/compile error (spec.md §4.6,
    /// §7).
    pub fn update_strategy(&self, raw: StrategyFile) -> Result<(), StrategyError> {
        let table = StrategyTable::compile(raw.clone())?;
        *self.strategy.write() = StrategyState { file: raw, table };
        Ok(())
    }

    /// The currently installed strategy document, for `GET /v1/strategy`.
    pub fn strategy_snapshot(&self) -> StrategyFile {
        self.strategy.read().file.clone()
    }

    pub fn record_duties(&self, epoch: i64, duties: Vec<ProposeDuty>) {
        self.duties.write().insert(epoch, duties);
    }

    pub fn set_role_override(&self, validator_index: i64, role: RoleType) {
        self.role_overrides.write().insert(validator_index, role);
    }

    pub fn clear_role_override(&self, validator_index: i64) {
        self.role_overrides.write().remove(&validator_index);
    }

    pub fn role_by_pubkey(&self, pubkey: &str, slot: i64) -> RoleType {
        match self.cache.validators.get_by_pubkey(pubkey) {
            Some(info) => self.validator_role(slot, info.index),
            None => RoleType::Normal,
        }
    }

    /// Runs the compiled strategy table's rule resolution for `(slot,
    /// point)` against this engine's own `SlotContext` view.
    pub fn resolve_action(&self, slot: i64, point: attacker_types::ActionPoint) -> Option<strategy::ActionSpec> {
        self.strategy.read().table.resolve(slot, point, self)
    }

    pub fn record_slot_start_now(&self, slot: u64) {
        let now = self.clock.now_duration();
        self.slot_starts.write().insert(slot, now);
    }

    pub fn slot_start(&self, slot: u64) -> Option<Duration> {
        self.slot_starts.read().get(&slot).copied()
    }

    /// The highest slot the service has actually observed through
    /// `block.DelayForReceiveBlock` traffic. The original service has no
    /// notion of a genesis-anchored wall clock — every hook call carries
    /// its own slot number — so REST introspection of "the current slot"
    /// (spec.md §6 `/v1/slot`, `/v1/epoch`) falls back to the most recent
    /// slot seen rather than a clock computation.
    pub fn latest_observed_slot(&self) -> Option<u64> {
        self.slot_starts.read().keys().copied().max()
    }
}

impl SlotContext for Engine {
    fn slots_per_epoch(&self) -> i64 {
        self.slots_per_epoch
    }

    fn propose_duties(&self, epoch: i64) -> Vec<ProposeDuty> {
        self.duties.read().get(&epoch).cloned().unwrap_or_default()
    }

    fn validator_role(&self, slot: i64, validator_index: i64) -> RoleType {
        if let Some(role) = self.role_overrides.read().get(&validator_index) {
            return *role;
        }
        self.strategy.read().table.roles().resolve(validator_index, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_clock::ManualSlotClock;
    use std::time::Duration as StdDuration;

    fn engine() -> Engine {
        let clock = Arc::new(ManualSlotClock::new(StdDuration::from_secs(0), StdDuration::from_secs(12)));
        let (_tx, rx) = task_executor::shutdown_channel();
        let handle = tokio::runtime::Handle::try_current().unwrap_or_else(|_| {
            panic!("tests must run under #[tokio::test]");
        });
        Engine::new(
            Arc::new(ArtifactCache::new()),
            clock,
            TaskExecutor::new(handle, rx),
            32,
            12,
            128,
        )
    }

    #[tokio::test]
    async fn role_override_takes_precedence_over_strategy() {
        let e = engine();
        assert_eq!(e.validator_role(10, 7), RoleType::Normal);
        e.set_role_override(7, RoleType::Attacker);
        assert_eq!(e.validator_role(10, 7), RoleType::Attacker);
        e.clear_role_override(7);
        assert_eq!(e.validator_role(10, 7), RoleType::Normal);
    }

    #[tokio::test]
    async fn unknown_pubkey_resolves_to_normal_role() {
        let e = engine();
        assert_eq!(e.role_by_pubkey("0xdead", 10), RoleType::Normal);
    }

    #[tokio::test]
    async fn recorded_duties_are_retrievable() {
        let e = engine();
        e.record_duties(0, vec![ProposeDuty::new(5, 7)]);
        assert_eq!(e.propose_duties(0), vec![ProposeDuty::new(5, 7)]);
    }

    #[tokio::test]
    async fn failed_strategy_update_keeps_prior_strategy() {
        let e = engine();
        let good = StrategyFile {
            slots: vec![],
            validators: vec![],
        };
        e.update_strategy(good).unwrap();
        let bad_json = r#"{"slots": [{"slot": "every", "level": 0, "actions": {"bogus": "continue"}}]}"#;
        let bad: StrategyFile = serde_json::from_str(bad_json).unwrap();
        assert!(e.update_strategy(bad).is_err());
        assert_eq!(e.strategy_snapshot(), good);
    }
}
