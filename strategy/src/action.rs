//! Action primitive DSL (component C5): each strategy rule maps an action
//! point to one of these, parsed from a `name` or `name:param[:param...]`
//! string. Grounded on `funcaction.go`'s `GetFunctionAction` table.
//!
//! The Go closures bake a backend-derived value (a random delay, or the
//! live interval-per-slot) in at strategy-load time, so a strategy reload
//! is the only way those values ever change. Here the params stay
//! declarative and the concrete duration is computed by the dispatcher at
//! the moment the action actually runs, against live clock/duty state —
//! avoiding a load-time value going stale across a long-running strategy.

use crate::error::StrategyError;
use attacker_types::AttackerCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpec {
    Command(AttackerCommand),
    StoreSignedAttest,
    /// Sleep this many seconds; `None` means pick one at random in `[0, 10)`
    /// when the action runs.
    DelayWithSecond(Option<u64>),
    DelayToNextSlot,
    /// Sleep until one slot past the current slot boundary, plus this many
    /// extra seconds; `None` means a random `[0, 10)` extra.
    DelayToAfterNextSlot(Option<u64>),
    DelayToNextNEpochStart(i64),
    DelayToNextNEpochEnd(i64),
    DelayToNextNEpochHalf(i64),
    DelayToEpochEnd,
    DelayHalfEpoch,
    RePackAttestation,
}

impl ActionSpec {
    pub fn parse(raw: &str) -> Result<Self, StrategyError> {
        let (name, params) = split_name_params(raw);
        let spec = match name {
            "null" => ActionSpec::Command(AttackerCommand::Null),
            "return" => ActionSpec::Command(AttackerCommand::Return),
            "continue" => ActionSpec::Command(AttackerCommand::Continue),
            "abort" => ActionSpec::Command(AttackerCommand::Abort),
            "skip" => ActionSpec::Command(AttackerCommand::Skip),
            "exit" => ActionSpec::Command(AttackerCommand::Exit),
            "storeSignedAttest" => ActionSpec::StoreSignedAttest,
            "delayWithSecond" => ActionSpec::DelayWithSecond(params.first().map(|&v| v as u64)),
            "delayToNextSlot" => ActionSpec::DelayToNextSlot,
            "delayToAfterNextSlot" => ActionSpec::DelayToAfterNextSlot(params.first().map(|&v| v as u64)),
            "delayToNextNEpochStart" => ActionSpec::DelayToNextNEpochStart(params.first().copied().unwrap_or(1)),
            "delayToNextNEpochEnd" => ActionSpec::DelayToNextNEpochEnd(params.first().copied().unwrap_or(0)),
            "delayToNextNEpochHalf" => ActionSpec::DelayToNextNEpochHalf(params.first().copied().unwrap_or(1)),
            "delayToEpochEnd" => ActionSpec::DelayToEpochEnd,
            "delayHalfEpoch" => ActionSpec::DelayHalfEpoch,
            "rePackAttestation" => ActionSpec::RePackAttestation,
            other => return Err(StrategyError::UnknownActionFunction(other.to_string())),
        };
        Ok(spec)
    }
}

/// Splits `name:1:2` into `("name", [1, 2])`; non-numeric segments are
/// dropped, matching `funcaction.go`'s `ParseActionName`.
fn split_name_params(raw: &str) -> (&str, Vec<i64>) {
    let mut parts = raw.split(':');
    let name = parts.next().unwrap_or("");
    let params = parts.filter_map(|p| p.parse::<i64>().ok()).collect();
    (name, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(ActionSpec::parse("continue").unwrap(), ActionSpec::Command(AttackerCommand::Continue));
        assert_eq!(ActionSpec::parse("abort").unwrap(), ActionSpec::Command(AttackerCommand::Abort));
    }

    #[test]
    fn parses_delay_with_explicit_seconds() {
        assert_eq!(ActionSpec::parse("delayWithSecond:7").unwrap(), ActionSpec::DelayWithSecond(Some(7)));
    }

    #[test]
    fn parses_delay_with_no_params_as_random() {
        assert_eq!(ActionSpec::parse("delayWithSecond").unwrap(), ActionSpec::DelayWithSecond(None));
    }

    #[test]
    fn parses_epoch_delays_with_defaults() {
        assert_eq!(ActionSpec::parse("delayToNextNEpochStart").unwrap(), ActionSpec::DelayToNextNEpochStart(1));
        assert_eq!(ActionSpec::parse("delayToNextNEpochEnd").unwrap(), ActionSpec::DelayToNextNEpochEnd(0));
        assert_eq!(
            ActionSpec::parse("delayToNextNEpochStart:3").unwrap(),
            ActionSpec::DelayToNextNEpochStart(3)
        );
    }

    #[test]
    fn non_numeric_trailing_params_are_dropped() {
        assert_eq!(ActionSpec::parse("delayWithSecond:abc").unwrap(), ActionSpec::DelayWithSecond(None));
    }

    #[test]
    fn unknown_action_name_is_rejected() {
        assert!(ActionSpec::parse("doesNotExist").is_err());
    }
}
