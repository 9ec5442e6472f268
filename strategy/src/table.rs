//! Strategy table (component C6): a compiled, hot-swappable set of slot
//! rules plus the validator role windows. Grounded on
//! `slotStrategy.go`'s `ParseToInternalSlotStrategy` and `strategy.go`'s
//! `ParseStrategy`.

use crate::action::ActionSpec;
use crate::error::StrategyError;
use crate::predicate::{SlotContext, SlotPredicate};
use crate::role::RoleTable;
use crate::wire::StrategyFile;
use attacker_types::ActionPoint;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub predicate: SlotPredicate,
    pub level: i64,
    pub actions: HashMap<ActionPoint, ActionSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct StrategyTable {
    rules: Vec<CompiledRule>,
    roles: RoleTable,
}

impl StrategyTable {
    /// Parses and validates a strategy document. Every action point name
    /// must be one of the known points, and every slot/action function
    /// name must be recognised — matching the Go service's all-or-nothing
    /// `ParseToInternalSlotStrategy` behaviour (one bad rule rejects the
    /// whole reload, leaving the previous table in place).
    pub fn compile(file: StrategyFile) -> Result<Self, StrategyError> {
        let mut rules = Vec::with_capacity(file.slots.len());
        for raw in file.slots {
            let predicate = SlotPredicate::parse(&raw.slot)?;
            let mut actions = HashMap::with_capacity(raw.actions.len());
            for (point_name, action_name) in raw.actions {
                let point = ActionPoint::from_str(&point_name)?;
                let action = ActionSpec::parse(&action_name)?;
                actions.insert(point, action);
            }
            rules.push(CompiledRule {
                predicate,
                level: raw.level,
                actions,
            });
        }
        let roles = RoleTable::new(file.validators);
        Ok(StrategyTable { rules, roles })
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    /// The action to run for `point` at `slot`. First picks the single
    /// winning rule among every rule whose predicate matches `slot` — the
    /// highest `level` wins, ties broken by the rule that appears later in
    /// the table (spec.md §4.4's "later rule wins" tiebreak, since a reload
    /// appends overrides after the base rules) — *without regard to which
    /// action points that rule defines*. Only then does it look up `point`
    /// on that one winner, returning `None` (Null, pass-through) if the
    /// winning rule doesn't define it, even when some other, lower-level
    /// matching rule does. This mirrors `findMaxLevelStrategy` in the Go
    /// original, which selects the winner over the whole strategy list
    /// first and only afterward indexes `st.Actions[name]`.
    pub fn resolve(&self, slot: i64, point: ActionPoint, ctx: &dyn SlotContext) -> Option<ActionSpec> {
        let mut best: Option<&CompiledRule> = None;
        for rule in self.rules.iter() {
            if !rule.predicate.matches(slot, ctx) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => rule.level >= current.level,
            };
            if better {
                best = Some(rule);
            }
        }
        best.and_then(|rule| rule.actions.get(&point).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attacker_types::{ProposeDuty, RoleType};

    struct NoopCtx;
    impl SlotContext for NoopCtx {
        fn slots_per_epoch(&self) -> i64 {
            32
        }
        fn propose_duties(&self, _epoch: i64) -> Vec<ProposeDuty> {
            vec![]
        }
        fn validator_role(&self, _slot: i64, _validator_index: i64) -> RoleType {
            RoleType::Normal
        }
    }

    fn rule(predicate: SlotPredicate, level: i64, point: ActionPoint, action: ActionSpec) -> CompiledRule {
        let mut actions = HashMap::new();
        actions.insert(point, action);
        CompiledRule { predicate, level, actions }
    }

    #[test]
    fn compiles_a_full_strategy_document() {
        let json = r#"{
            "slots": [
                {"slot": "every", "level": 0, "actions": {"attest.before_sign": "continue"}}
            ],
            "validator": [{"validator_index": 1, "attacker_start_slot": 0, "attacker_end_slot": 10}]
        }"#;
        let file: StrategyFile = serde_json::from_str(json).unwrap();
        let table = StrategyTable::compile(file).unwrap();
        assert_eq!(table.roles().resolve(1, 5), RoleType::Attacker);
    }

    #[test]
    fn unknown_action_point_rejects_the_whole_document() {
        let json = r#"{"slots": [{"slot": "every", "level": 0, "actions": {"bogus.point": "continue"}}]}"#;
        let file: StrategyFile = serde_json::from_str(json).unwrap();
        assert!(StrategyTable::compile(file).is_err());
    }

    #[test]
    fn higher_level_rule_wins_over_lower() {
        let table = StrategyTable {
            rules: vec![
                rule(SlotPredicate::Every, 0, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Continue)),
                rule(SlotPredicate::Every, 5, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Abort)),
            ],
            roles: RoleTable::default(),
        };
        let action = table.resolve(10, ActionPoint::AttestBeforeSign, &NoopCtx).unwrap();
        assert_eq!(action, ActionSpec::Command(attacker_types::AttackerCommand::Abort));
    }

    #[test]
    fn equal_level_ties_are_broken_by_later_rule() {
        let table = StrategyTable {
            rules: vec![
                rule(SlotPredicate::Every, 0, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Continue)),
                rule(SlotPredicate::Every, 0, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Skip)),
            ],
            roles: RoleTable::default(),
        };
        let action = table.resolve(10, ActionPoint::AttestBeforeSign, &NoopCtx).unwrap();
        assert_eq!(action, ActionSpec::Command(attacker_types::AttackerCommand::Skip));
    }

    #[test]
    fn non_matching_predicate_is_skipped() {
        let table = StrategyTable {
            rules: vec![rule(SlotPredicate::Number(5), 10, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Abort))],
            roles: RoleTable::default(),
        };
        assert!(table.resolve(6, ActionPoint::AttestBeforeSign, &NoopCtx).is_none());
    }

    #[test]
    fn winning_rule_without_the_requested_point_yields_none() {
        let table = StrategyTable {
            rules: vec![rule(SlotPredicate::Every, 10, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Abort))],
            roles: RoleTable::default(),
        };
        assert!(table.resolve(6, ActionPoint::BlockBeforeSign, &NoopCtx).is_none());
    }

    #[test]
    fn higher_level_winner_without_the_point_beats_a_lower_rule_that_has_it() {
        // A level-10 rule wins overall even though it only defines
        // AttestAfterSign; a level-0 rule defining AttestBeforeSign must
        // NOT be consulted just because it happens to have the point.
        let table = StrategyTable {
            rules: vec![
                rule(SlotPredicate::Every, 10, ActionPoint::AttestAfterSign, ActionSpec::Command(attacker_types::AttackerCommand::Abort)),
                rule(SlotPredicate::Every, 0, ActionPoint::AttestBeforeSign, ActionSpec::Command(attacker_types::AttackerCommand::Return)),
            ],
            roles: RoleTable::default(),
        };
        assert!(table.resolve(10, ActionPoint::AttestBeforeSign, &NoopCtx).is_none());
    }
}
