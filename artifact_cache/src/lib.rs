//! Artifact cache (component C2): concurrent mapping from slot to in-flight
//! validator artifacts (attestations, blocks), plus the validator index<->
//! pubkey directory populated by the duty poller (C9).

mod slot_set;
mod validators;

pub use slot_set::{SlotArtifactSet, DEFAULT_RETAINED_EPOCHS};
pub use validators::ValidatorDirectory;

use bytes::Bytes;

/// Owns the two `SlotArtifactSet`s and the validator directory. Cloned
/// cheaply (all internals are `Arc`-free but interior-mutable via
/// `parking_lot::RwLock`; callers share one `ArtifactCache` behind an
/// `Arc`, following the `ValidatorDataSet` ownership pattern in the
/// original Go service).
#[derive(Default)]
pub struct ArtifactCache {
    pub validators: ValidatorDirectory,
    attestations: SlotArtifactSet,
    blocks: SlotArtifactSet,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_validator(&self, index: i64, pubkey: &str) {
        self.validators.add_validator(index, pubkey);
    }

    pub fn add_attestation(&self, slot: u64, pubkey: &str, artifact: Bytes) {
        self.attestations.insert(slot, pubkey, artifact);
    }

    pub fn get_attestation(&self, slot: u64, pubkey: &str) -> Option<Bytes> {
        self.attestations.get(slot, pubkey)
    }

    pub fn attestations_in_range(&self, start_slot: u64, end_slot_inclusive: u64) -> Vec<(u64, String, Bytes)> {
        self.attestations.in_range(start_slot, end_slot_inclusive)
    }

    pub fn add_block(&self, slot: u64, pubkey: &str, artifact: Bytes) {
        self.blocks.insert(slot, pubkey, artifact);
    }

    pub fn get_block(&self, slot: u64, pubkey: &str) -> Option<Bytes> {
        self.blocks.get(slot, pubkey)
    }

    /// Drops cached artifacts older than the retained window (spec.md §9).
    pub fn prune(&self, current_epoch: u64, slots_per_epoch: u64) {
        self.attestations
            .prune(current_epoch, slots_per_epoch, DEFAULT_RETAINED_EPOCHS);
        self.blocks
            .prune(current_epoch, slots_per_epoch, DEFAULT_RETAINED_EPOCHS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attestation_and_block_caches_are_independent() {
        let cache = ArtifactCache::new();
        cache.add_attestation(10, "0xaa", Bytes::from_static(b"att"));
        cache.add_block(10, "0xaa", Bytes::from_static(b"blk"));
        assert_eq!(cache.get_attestation(10, "0xaa"), Some(Bytes::from_static(b"att")));
        assert_eq!(cache.get_block(10, "0xaa"), Some(Bytes::from_static(b"blk")));
    }

    #[test]
    fn validator_directory_reachable_through_cache() {
        let cache = ArtifactCache::new();
        cache.add_validator(7, "0xaa");
        assert_eq!(cache.validators.get_by_index(7).unwrap().pubkey, "0xaa");
    }
}
