//! Generic `slot -> (pubkey -> artifact)` store used for both the
//! attestation and the block cache (component C2).

use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Number of epochs of artifacts retained before pruning (design note in
/// spec.md §9: "impose a sliding window of the last K epochs").
pub const DEFAULT_RETAINED_EPOCHS: u64 = 4;

#[derive(Default)]
pub struct SlotArtifactSet {
    by_slot: RwLock<HashMap<u64, HashMap<String, Bytes>>>,
}

impl SlotArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any prior entry for `(slot, pubkey)` — spec.md §4.2.
    pub fn insert(&self, slot: u64, pubkey: &str, artifact: Bytes) {
        self.by_slot
            .write()
            .entry(slot)
            .or_default()
            .insert(pubkey.to_string(), artifact);
    }

    pub fn get(&self, slot: u64, pubkey: &str) -> Option<Bytes> {
        self.by_slot.read().get(&slot).and_then(|m| m.get(pubkey).cloned())
    }

    /// All `(pubkey, artifact)` pairs recorded for `slot`, or empty if none.
    pub fn for_slot(&self, slot: u64) -> Vec<(String, Bytes)> {
        self.by_slot
            .read()
            .get(&slot)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// All `(pubkey, artifact)` pairs across an inclusive slot range,
    /// flattened. Used by `rePackAttestation` (spec.md §4.5) to gather
    /// cached attestations across an epoch.
    pub fn in_range(&self, start_slot: u64, end_slot_inclusive: u64) -> Vec<(u64, String, Bytes)> {
        let guard = self.by_slot.read();
        let mut out = Vec::new();
        for slot in start_slot..=end_slot_inclusive {
            if let Some(m) = guard.get(&slot) {
                for (pubkey, artifact) in m {
                    out.push((slot, pubkey.clone(), artifact.clone()));
                }
            }
        }
        out
    }

    /// Drops all slots whose epoch is more than `retained_epochs` behind
    /// `current_epoch`. A no-op once the retained window covers everything.
    pub fn prune(&self, current_epoch: u64, slots_per_epoch: u64, retained_epochs: u64) {
        let floor_epoch = current_epoch.saturating_sub(retained_epochs);
        let floor_slot = floor_epoch * slots_per_epoch;
        self.by_slot.write().retain(|&slot, _| slot >= floor_slot);
    }

    pub fn slot_count(&self) -> usize {
        self.by_slot.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    // -- insert / get --

    #[test]
    fn insert_then_get_round_trips() {
        let set = SlotArtifactSet::new();
        set.insert(10, "0xaa", bytes(b"att1"));
        assert_eq!(set.get(10, "0xaa"), Some(bytes(b"att1")));
    }

    #[test]
    fn insert_replaces_prior_entry_for_same_slot_pubkey() {
        let set = SlotArtifactSet::new();
        set.insert(10, "0xaa", bytes(b"v1"));
        set.insert(10, "0xaa", bytes(b"v2"));
        assert_eq!(set.get(10, "0xaa"), Some(bytes(b"v2")));
    }

    #[test]
    fn distinct_pubkeys_in_same_slot_coexist() {
        let set = SlotArtifactSet::new();
        set.insert(10, "0xaa", bytes(b"a"));
        set.insert(10, "0xbb", bytes(b"b"));
        assert_eq!(set.for_slot(10).len(), 2);
    }

    // -- range queries --

    #[test]
    fn in_range_flattens_across_slots() {
        let set = SlotArtifactSet::new();
        set.insert(32, "0xaa", bytes(b"a"));
        set.insert(40, "0xbb", bytes(b"b"));
        set.insert(63, "0xcc", bytes(b"c"));
        set.insert(64, "0xdd", bytes(b"d")); // outside range
        let got = set.in_range(32, 63);
        assert_eq!(got.len(), 3);
    }

    #[test]
    fn in_range_empty_when_nothing_cached() {
        let set = SlotArtifactSet::new();
        assert!(set.in_range(0, 31).is_empty());
    }

    // -- pruning --

    #[test]
    fn prune_drops_slots_older_than_retained_window() {
        let set = SlotArtifactSet::new();
        set.insert(0, "0xaa", bytes(b"old"));
        set.insert(32 * 3, "0xbb", bytes(b"mid"));
        set.insert(32 * 10, "0xcc", bytes(b"new"));
        // current epoch 10, retain 4 epochs -> floor epoch 6 -> floor slot 192
        set.prune(10, 32, 4);
        assert!(set.get(0, "0xaa").is_none());
        assert!(set.get(96, "0xbb").is_none());
        assert_eq!(set.get(320, "0xcc"), Some(bytes(b"new")));
    }

    #[test]
    fn prune_is_noop_when_current_epoch_within_window() {
        let set = SlotArtifactSet::new();
        set.insert(0, "0xaa", bytes(b"a"));
        set.prune(2, 32, 4);
        assert_eq!(set.get(0, "0xaa"), Some(bytes(b"a")));
    }
}
