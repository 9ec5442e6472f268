//! Strategy DSL and table (components C4/C5/C6): slot predicates, action
//! primitives, and the compiled, hot-swappable rule table that the hook
//! dispatcher (C7) queries on every hook call.

mod action;
mod error;
mod predicate;
mod role;
mod table;
mod wire;

pub use action::ActionSpec;
pub use error::StrategyError;
pub use predicate::{SlotContext, SlotPredicate};
pub use role::RoleTable;
pub use table::{CompiledRule, StrategyTable};
pub use wire::{RawSlotRule, StrategyFile, ValidatorWindow};
