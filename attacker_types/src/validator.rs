//! Validator identity and role (parts of C2/C8).

use serde::{Deserialize, Serialize};

/// `{ index, pubkey }`, normalized to a `0x`-prefixed lowercase 48-byte hex
/// string. Invariant: `index <-> pubkey` is one-to-one; last-writer-wins on
/// conflicting re-registration (duty rosters are the source of truth, see
/// `spec.md` §4.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub index: i64,
    pub pubkey: String,
}

impl ValidatorInfo {
    pub fn new(index: i64, pubkey: impl Into<String>) -> Self {
        ValidatorInfo {
            index,
            pubkey: normalize_pubkey(&pubkey.into()),
        }
    }
}

/// Normalizes a pubkey to a `0x`-prefixed lowercase string, matching the
/// Go original's `padPubkey` plus case folding for lookup-by-pubkey.
pub fn normalize_pubkey(pubkey: &str) -> String {
    let lower = pubkey.to_ascii_lowercase();
    if lower.starts_with("0x") {
        lower
    } else {
        format!("0x{lower}")
    }
}

/// Derived, not stored: `role(idx, slot) = Attacker` iff some validator
/// window rule in the strategy covers `(idx, slot)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleType {
    Normal,
    Attacker,
}

impl RoleType {
    pub fn is_attacker(self) -> bool {
        matches!(self, RoleType::Attacker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_missing_prefix() {
        assert_eq!(normalize_pubkey("AAbb"), "0xaabb");
    }

    #[test]
    fn normalizes_existing_prefix_case() {
        assert_eq!(normalize_pubkey("0xAABB"), "0xaabb");
    }

    #[test]
    fn validator_info_normalizes_on_construction() {
        let v = ValidatorInfo::new(7, "0xABCDEF");
        assert_eq!(v.pubkey, "0xabcdef");
    }
}
