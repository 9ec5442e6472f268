//! Action execution (component C5): turns a compiled `ActionSpec` into the
//! side effects it names and a `{cmd, result}` outcome. Grounded on
//! `funcaction.go`'s closures, one arm per action name.

use crate::block::{BlockVariant, RawBlock};
use crate::error::HookError;
use crate::state::Engine;
use aggregation::RawAttestation;
use attacker_types::{ActionPoint, AttackerCommand, RoleType};
use bytes::Bytes;
use rand::Rng;
use std::time::Duration;
use strategy::ActionSpec;

/// What an action produced: the command to report, and an optional
/// replacement payload. `result: None` means "no opinion" — the dispatcher
/// falls back to the original incoming payload (spec.md §4.7 step 5).
pub struct ActionOutcome {
    pub cmd: AttackerCommand,
    pub result: Option<Bytes>,
}

impl ActionOutcome {
    fn command(cmd: AttackerCommand) -> Self {
        ActionOutcome { cmd, result: None }
    }

    fn command_with(cmd: AttackerCommand, result: Option<Bytes>) -> Self {
        ActionOutcome { cmd, result }
    }
}

/// `seconds_per_slot * slots`, clamped so a negative delta never produces
/// a negative (and thus panicking-on-cast) sleep duration.
fn slots_to_duration(seconds_per_slot: u64, slots: i64) -> Duration {
    if slots <= 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(seconds_per_slot.saturating_mul(slots as u64))
    }
}

pub async fn execute(
    engine: &Engine,
    spec: ActionSpec,
    slot: i64,
    pubkey: Option<&str>,
    point: ActionPoint,
    payload: Option<Bytes>,
) -> Result<ActionOutcome, HookError> {
    tracing::debug!(slot, ?point, "running action");
    match spec {
        ActionSpec::Command(cmd) => Ok(ActionOutcome::command_with(cmd, payload)),

        ActionSpec::StoreSignedAttest => {
            if let (Some(pubkey), Some(bytes)) = (pubkey, payload.clone()) {
                engine.cache().add_attestation(slot as u64, pubkey, bytes);
            }
            Ok(ActionOutcome::command_with(AttackerCommand::Null, payload))
        }

        ActionSpec::DelayWithSecond(secs) => {
            let seconds = secs.unwrap_or_else(random_small_delay);
            Ok(sleep_outcome(engine, Duration::from_secs(seconds)).await)
        }

        ActionSpec::DelayToNextSlot => {
            let wait = next_slot_wait(engine, slot, 0);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayToAfterNextSlot(extra) => {
            let extra = extra.unwrap_or_else(random_small_delay);
            let wait = next_slot_wait(engine, slot, extra);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayToNextNEpochStart(n) => {
            let epoch = attacker_types::slot_to_epoch(slot, engine.slots_per_epoch);
            let start = attacker_types::epoch_start(epoch + n, engine.slots_per_epoch);
            let wait = slots_to_duration(engine.seconds_per_slot, start - slot);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayToNextNEpochEnd(n) => {
            let epoch = attacker_types::slot_to_epoch(slot, engine.slots_per_epoch);
            let end = attacker_types::epoch_end(epoch + n, engine.slots_per_epoch);
            let wait = slots_to_duration(engine.seconds_per_slot, end - slot);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayToNextNEpochHalf(n) => {
            let epoch = attacker_types::slot_to_epoch(slot, engine.slots_per_epoch);
            let start = attacker_types::epoch_start(epoch + n, engine.slots_per_epoch);
            let slots = (start - slot) + engine.slots_per_epoch / 2;
            let wait = slots_to_duration(engine.seconds_per_slot, slots);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayToEpochEnd => {
            let epoch = attacker_types::slot_to_epoch(slot, engine.slots_per_epoch);
            let end = attacker_types::epoch_end(epoch, engine.slots_per_epoch);
            let wait = slots_to_duration(engine.seconds_per_slot, end - slot);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::DelayHalfEpoch => {
            let wait = slots_to_duration(engine.seconds_per_slot, engine.slots_per_epoch / 2);
            Ok(sleep_outcome(engine, wait).await)
        }

        ActionSpec::RePackAttestation => {
            let Some(bytes) = payload else {
                return Ok(ActionOutcome::command(AttackerCommand::Null));
            };
            let block = RawBlock::decode(bytes)?;
            block.require_deneb()?;
            let repacked = repack_block(engine, &block)?;
            Ok(ActionOutcome::command_with(AttackerCommand::Null, Some(repacked.encode())))
        }
    }
}

fn random_small_delay() -> u64 {
    rand::rng().random_range(0..10)
}

/// Sleeps `duration`, honoring the executor's shutdown signal (spec.md §5:
/// "on shutdown, running delays return Abort").
async fn sleep_outcome(engine: &Engine, duration: Duration) -> ActionOutcome {
    if engine.executor().cancellable_sleep(duration).await {
        ActionOutcome::command(AttackerCommand::Null)
    } else {
        ActionOutcome::command(AttackerCommand::Abort)
    }
}

/// `seconds_per_slot - elapsed_since(slot_start)`, plus `extra` seconds,
/// clamped to zero. `slot_start` falls back to "now" when the service
/// never observed `BlockDelayForReceiveBlock` for this slot (spec.md §4.5).
fn next_slot_wait(engine: &Engine, slot: i64, extra: u64) -> Duration {
    let now = engine.clock().now_duration();
    let slot_start = engine.slot_start(slot as u64).unwrap_or(now);
    let target = slot_start + Duration::from_secs(engine.seconds_per_slot) + Duration::from_secs(extra);
    target.checked_sub(now).unwrap_or(Duration::ZERO)
}

/// `rePackAttestation` (spec.md §4.5): fold every cached attestation in
/// `[epoch_start, epoch_end]` of `block.slot` from an attacker-role
/// validator into the block's existing attestation list, then run the
/// full C3 re-aggregation pipeline.
fn repack_block(engine: &Engine, block: &RawBlock) -> Result<RawBlock, HookError> {
    let epoch = attacker_types::slot_to_epoch(block.slot as i64, engine.slots_per_epoch);
    let start = attacker_types::epoch_start(epoch, engine.slots_per_epoch) as u64;
    let end = attacker_types::epoch_end(epoch, engine.slots_per_epoch) as u64;

    let mut pool = block.attestations.clone();
    for (cached_slot, pubkey, raw) in engine.cache().attestations_in_range(start, end) {
        let role = engine.role_by_pubkey(&pubkey, cached_slot as i64);
        if role != RoleType::Attacker {
            continue;
        }
        match RawAttestation::decode(raw) {
            Ok(att) => pool.push(att),
            Err(err) => {
                tracing::warn!(slot = cached_slot, pubkey, error = %err, "dropping undecodable cached attestation");
            }
        }
    }

    let packed = aggregation::repack(pool, engine.max_attestations_per_block);
    Ok(RawBlock::new(block.slot, BlockVariant::Deneb, packed))
}
