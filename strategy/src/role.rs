//! Validator role resolution (component C8): a validator is `Attacker` for
//! any slot inside one of its configured windows, `Normal` otherwise.
//! Grounded on `types.Strategy.GetValidatorRole` (`strategy.go`); a validator
//! absent from the table, or outside every window, is always `Normal`.

use crate::wire::ValidatorWindow;
use attacker_types::RoleType;

#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    windows: Vec<ValidatorWindow>,
}

impl RoleTable {
    pub fn new(windows: Vec<ValidatorWindow>) -> Self {
        RoleTable { windows }
    }

    pub fn resolve(&self, validator_index: i64, slot: i64) -> RoleType {
        let is_attacker = self.windows.iter().any(|w| {
            w.validator_index == validator_index
                && slot >= w.attacker_start_slot
                && slot <= w.attacker_end_slot
        });
        if is_attacker {
            RoleType::Attacker
        } else {
            RoleType::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(idx: i64, start: i64, end: i64) -> ValidatorWindow {
        ValidatorWindow {
            validator_index: idx,
            attacker_start_slot: start,
            attacker_end_slot: end,
        }
    }

    #[test]
    fn inside_window_is_attacker() {
        let table = RoleTable::new(vec![window(7, 100, 200)]);
        assert_eq!(table.resolve(7, 150), RoleType::Attacker);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let table = RoleTable::new(vec![window(7, 100, 200)]);
        assert_eq!(table.resolve(7, 100), RoleType::Attacker);
        assert_eq!(table.resolve(7, 200), RoleType::Attacker);
    }

    #[test]
    fn outside_window_is_normal() {
        let table = RoleTable::new(vec![window(7, 100, 200)]);
        assert_eq!(table.resolve(7, 201), RoleType::Normal);
        assert_eq!(table.resolve(7, 99), RoleType::Normal);
    }

    #[test]
    fn unlisted_validator_is_normal() {
        let table = RoleTable::new(vec![window(7, 100, 200)]);
        assert_eq!(table.resolve(8, 150), RoleType::Normal);
    }

    #[test]
    fn multiple_windows_for_same_validator_are_all_checked() {
        let table = RoleTable::new(vec![window(7, 0, 10), window(7, 100, 200)]);
        assert_eq!(table.resolve(7, 150), RoleType::Attacker);
        assert_eq!(table.resolve(7, 50), RoleType::Normal);
    }
}
