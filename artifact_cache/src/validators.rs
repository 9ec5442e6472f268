//! Concurrent index<->pubkey validator directory (part of component C2).
//!
//! Grounded on `original_source/types/validatorSet.go`'s `ValidatorDataSet`:
//! two maps kept in lockstep, idempotent insert, last-writer-wins on a
//! conflicting re-registration (duty rosters are the source of truth).

use attacker_types::{normalize_pubkey, ValidatorInfo};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct ValidatorDirectory {
    by_index: RwLock<HashMap<i64, ValidatorInfo>>,
    by_pubkey: RwLock<HashMap<String, ValidatorInfo>>,
}

impl ValidatorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: re-registering the same `(index, pubkey)` pair is a
    /// no-op; a conflicting pair overwrites both maps (last-writer-wins).
    pub fn add_validator(&self, index: i64, pubkey: &str) {
        let pubkey = normalize_pubkey(pubkey);
        if let Some(existing) = self.by_index.read().get(&index) {
            if existing.pubkey == pubkey {
                return;
            }
        }
        let info = ValidatorInfo {
            index,
            pubkey: pubkey.clone(),
        };
        self.by_index.write().insert(index, info.clone());
        self.by_pubkey.write().insert(pubkey, info);
    }

    pub fn get_by_index(&self, index: i64) -> Option<ValidatorInfo> {
        self.by_index.read().get(&index).cloned()
    }

    /// Lookup normalizes the `0x` prefix and case, per spec.md §4.2.
    pub fn get_by_pubkey(&self, pubkey: &str) -> Option<ValidatorInfo> {
        let pubkey = normalize_pubkey(pubkey);
        self.by_pubkey.read().get(&pubkey).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
