//! Slot predicate DSL (component C4): each strategy rule's `slot` field
//! names a predicate over the current slot. Grounded on `funcslot.go`'s
//! `GetFunctionSlot` table; every named function there has a variant here.
//!
//! The Go implementation evaluates `calcFunc(slot) == slot`; the variants
//! below fold that indirection into a direct `matches` test, since nothing
//! else in the service ever reads the intermediate `calcFunc` value.

use crate::error::StrategyError;
use attacker_types::{epoch_end, epoch_start, slot_to_epoch, ProposeDuty, RoleType};

/// What a predicate needs from the running service to evaluate duty-aware
/// rules (`attackerSlot` and its `lastAttackerSlot...` siblings).
pub trait SlotContext {
    fn slots_per_epoch(&self) -> i64;
    fn propose_duties(&self, epoch: i64) -> Vec<ProposeDuty>;
    fn validator_role(&self, slot: i64, validator_index: i64) -> RoleType;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPredicate {
    Number(i64),
    Every,
    AttackerSlot,
    LastSlotInCurrentEpoch,
    LastSlotInNextEpoch,
    FirstSlotInCurrentEpoch,
    FirstSlotInNextEpoch,
    LastAttackerSlotInCurrentEpoch,
    LastAttackerSlotInNextEpoch,
}

impl SlotPredicate {
    pub fn parse(raw: &str) -> Result<Self, StrategyError> {
        if let Ok(n) = raw.parse::<i64>() {
            return Ok(SlotPredicate::Number(n));
        }
        match raw {
            "every" => Ok(SlotPredicate::Every),
            "attackerSlot" => Ok(SlotPredicate::AttackerSlot),
            "lastSlotInCurrentEpoch" => Ok(SlotPredicate::LastSlotInCurrentEpoch),
            "lastSlotInNextEpoch" => Ok(SlotPredicate::LastSlotInNextEpoch),
            "firstSlotInCurrentEpoch" => Ok(SlotPredicate::FirstSlotInCurrentEpoch),
            "firstSlotInNextEpoch" => Ok(SlotPredicate::FirstSlotInNextEpoch),
            "lastAttackerSlotInCurrentEpoch" => Ok(SlotPredicate::LastAttackerSlotInCurrentEpoch),
            "lastAttackerSlotInNextEpoch" => Ok(SlotPredicate::LastAttackerSlotInNextEpoch),
            other => Err(StrategyError::UnknownSlotFunction(other.to_string())),
        }
    }

    pub fn matches(&self, slot: i64, ctx: &dyn SlotContext) -> bool {
        match self {
            SlotPredicate::Number(n) => *n == slot,
            SlotPredicate::Every => true,
            SlotPredicate::AttackerSlot => {
                let spe = ctx.slots_per_epoch();
                let epoch = slot_to_epoch(slot, spe);
                ctx.propose_duties(epoch).iter().any(|duty| {
                    duty.slot as i64 == slot
                        && ctx.validator_role(duty.slot as i64, duty.validator_index) == RoleType::Attacker
                })
            }
            SlotPredicate::LastSlotInCurrentEpoch => {
                let spe = ctx.slots_per_epoch();
                slot == epoch_end(slot_to_epoch(slot, spe), spe)
            }
            SlotPredicate::LastSlotInNextEpoch => {
                let spe = ctx.slots_per_epoch();
                slot == epoch_end(slot_to_epoch(slot, spe) + 1, spe)
            }
            SlotPredicate::FirstSlotInCurrentEpoch => {
                let spe = ctx.slots_per_epoch();
                slot == epoch_start(slot_to_epoch(slot, spe), spe)
            }
            SlotPredicate::FirstSlotInNextEpoch => {
                let spe = ctx.slots_per_epoch();
                slot == epoch_start(slot_to_epoch(slot, spe) + 1, spe)
            }
            SlotPredicate::LastAttackerSlotInCurrentEpoch => {
                let spe = ctx.slots_per_epoch();
                let epoch = slot_to_epoch(slot, spe);
                slot == last_attacker_slot(ctx, epoch)
            }
            SlotPredicate::LastAttackerSlotInNextEpoch => {
                let spe = ctx.slots_per_epoch();
                let epoch = slot_to_epoch(slot, spe) + 1;
                slot == last_attacker_slot(ctx, epoch)
            }
        }
    }
}

/// Highest duty slot in `epoch` whose assigned validator is an attacker at
/// that slot, or `-1` if the epoch has no attacker-assigned duty (matching
/// `funcslot.go`'s sentinel default of `-1`, which never equals a real slot).
fn last_attacker_slot(ctx: &dyn SlotContext, epoch: i64) -> i64 {
    ctx.propose_duties(epoch)
        .iter()
        .filter(|duty| ctx.validator_role(duty.slot as i64, duty.validator_index) == RoleType::Attacker)
        .map(|duty| duty.slot as i64)
        .max()
        .unwrap_or(-1)
}
