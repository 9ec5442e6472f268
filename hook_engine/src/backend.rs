//! Capability-bundle traits (spec.md §9 design note: "interface graph
//! instead of inheritance"). The Go source layers `ExecuteBackend` /
//! `BeaconBackend` / `CacheBackend` / `StrategyBackend` onto one concrete
//! object (`types/backend.go`'s `ServiceBackend`); here each narrow trait
//! is implemented directly by `Engine`, and callers depend on the slice
//! they actually use rather than the single bundle.

use artifact_cache::ArtifactCache;
use attacker_types::{ProposeDuty, RoleType};

/// What C5's `rePackAttestation` and C2 lookups need: read access to the
/// cached attestation/block artifacts.
pub trait ArtifactSource {
    fn artifacts(&self) -> &ArtifactCache;
}

/// What C4's duty-aware predicates (`attackerSlot`, …) need.
pub trait DutySource {
    fn duties_for_epoch(&self, epoch: i64) -> Vec<ProposeDuty>;
}

/// What C8 exposes to both the DSL and the admin RPC methods.
pub trait RoleSource {
    fn role(&self, validator_index: i64, slot: i64) -> RoleType;
    fn role_by_pubkey(&self, pubkey: &str, slot: i64) -> RoleType;
}

/// The union of everything a hook handler might need from the running
/// service. Anything that implements the three narrower traits gets this
/// for free — no handler is written against `ServiceBackend` directly
/// unless it genuinely needs all three facets.
pub trait ServiceBackend: ArtifactSource + DutySource + RoleSource {}

impl<T: ArtifactSource + DutySource + RoleSource> ServiceBackend for T {}

impl ArtifactSource for crate::state::Engine {
    fn artifacts(&self) -> &ArtifactCache {
        self.cache()
    }
}

impl DutySource for crate::state::Engine {
    fn duties_for_epoch(&self, epoch: i64) -> Vec<ProposeDuty> {
        strategy::SlotContext::propose_duties(self, epoch)
    }
}

impl RoleSource for crate::state::Engine {
    fn role(&self, validator_index: i64, slot: i64) -> RoleType {
        strategy::SlotContext::validator_role(self, slot, validator_index)
    }

    fn role_by_pubkey(&self, pubkey: &str, slot: i64) -> RoleType {
        crate::state::Engine::role_by_pubkey(self, pubkey, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Engine;
    use slot_clock::ManualSlotClock;
    use std::sync::Arc;
    use std::time::Duration;
    use task_executor::TaskExecutor;

    fn engine() -> Engine {
        let clock = Arc::new(ManualSlotClock::new(Duration::from_secs(0), Duration::from_secs(12)));
        let (_tx, rx) = task_executor::shutdown_channel();
        let handle = tokio::runtime::Handle::current();
        Engine::new(Arc::new(ArtifactCache::new()), clock, TaskExecutor::new(handle, rx), 32, 12, 128)
    }

    #[tokio::test]
    async fn engine_satisfies_the_full_service_backend_bundle() {
        fn assert_backend<T: ServiceBackend>(_t: &T) {}
        let e = engine();
        assert_backend(&e);
        assert_eq!(e.role(7, 10), RoleType::Normal);
        assert!(e.duties_for_epoch(0).is_empty());
    }
}
