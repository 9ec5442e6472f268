//! JSON shape of a strategy file (spec.md §4.4), unchanged field names and
//! layout from the Go service's `types.Strategy` (`strategy.go`) so existing
//! strategy files load without edits.

use crate::error::StrategyError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyFile {
    #[serde(default)]
    pub slots: Vec<RawSlotRule>,
    #[serde(default, rename = "validator")]
    pub validators: Vec<ValidatorWindow>,
}

impl StrategyFile {
    /// Reads and parses a strategy document off disk (the `strategy` config
    /// key, spec.md §8). A read or parse failure here is fatal at startup,
    /// unlike a failed `admin`-triggered reload which keeps the prior table.
    pub fn load(path: &Path) -> Result<Self, StrategyError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlotRule {
    pub slot: String,
    pub level: i64,
    #[serde(default)]
    pub actions: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorWindow {
    pub validator_index: i64,
    pub attacker_start_slot: i64,
    pub attacker_end_slot: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_strategy_file() {
        let json = r#"{
            "slots": [
                {"slot": "every", "level": 0, "actions": {"attest.before_sign": "continue"}}
            ],
            "validator": [
                {"validator_index": 7, "attacker_start_slot": 100, "attacker_end_slot": 200}
            ]
        }"#;
        let parsed: StrategyFile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.slots.len(), 1);
        assert_eq!(parsed.validators[0].validator_index, 7);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let parsed: StrategyFile = serde_json::from_str("{}").unwrap();
        assert!(parsed.slots.is_empty());
        assert!(parsed.validators.is_empty());
    }
}
