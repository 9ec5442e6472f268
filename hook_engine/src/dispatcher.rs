//! The hook dispatcher (component C7): the single entry point every
//! `attest.*`/`block.*` RPC method calls into. Grounded on
//! `server/apis/attest.go` / `server/apis/block.go`'s per-method handlers,
//! which all reduce to "resolve a rule, run its action, never fail".

use crate::actions;
use crate::state::Engine;
use attacker_types::{ActionPoint, AttackerCommand, HookPayload, PluginResponse};
use bytes::Bytes;
use metrics::{try_create_int_counter_vec, IntCounterVec};
use std::sync::LazyLock;

static HOOK_CALLS: LazyLock<Option<IntCounterVec>> = LazyLock::new(|| {
    try_create_int_counter_vec(
        "attacker_hook_calls_total",
        "hook dispatches by action point and returned command",
        &["action_point", "cmd"],
    )
    .ok()
});

#[derive(Clone)]
pub struct Dispatcher {
    engine: Engine,
}

impl Dispatcher {
    pub fn new(engine: Engine) -> Self {
        Dispatcher { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Dispatches one hook call (spec.md §4.7). Never returns an error to
    /// the caller: action failures degrade to a pass-through `Null`
    /// response, logged at `warn`.
    pub async fn dispatch(
        &self,
        point: ActionPoint,
        slot: i64,
        pubkey: Option<&str>,
        payload: Option<Bytes>,
    ) -> PluginResponse {
        if point == ActionPoint::BlockDelayForReceiveBlock {
            self.engine.record_slot_start_now(slot.max(0) as u64);
        }

        let response = match self.engine.resolve_action(slot, point) {
            None => PluginResponse {
                cmd: AttackerCommand::Null,
                result: payload.map(HookPayload::Bytes),
            },
            Some(spec) => match actions::execute(&self.engine, spec, slot, pubkey, point, payload.clone()).await {
                Ok(outcome) => PluginResponse {
                    cmd: outcome.cmd,
                    result: outcome.result.or(payload).map(HookPayload::Bytes),
                },
                Err(err) => {
                    tracing::warn!(slot, ?point, error = %err, "action failed, passing through");
                    PluginResponse {
                        cmd: AttackerCommand::Null,
                        result: payload.map(HookPayload::Bytes),
                    }
                }
            },
        };

        if let Some(counter) = HOOK_CALLS.as_ref() {
            counter.with_label_values(&[point.as_str(), cmd_label(response.cmd)]).inc();
        }
        response
    }

    /// `admin.SetRoleAttacker` / `admin.SetRoleNormal` (spec.md §6).
    pub fn set_role(&self, validator_index: i64, role: attacker_types::RoleType) {
        self.engine.set_role_override(validator_index, role);
    }
}

fn cmd_label(cmd: AttackerCommand) -> &'static str {
    match cmd {
        AttackerCommand::Null => "null",
        AttackerCommand::Continue => "continue",
        AttackerCommand::Return => "return",
        AttackerCommand::Abort => "abort",
        AttackerCommand::Skip => "skip",
        AttackerCommand::RoleToNormal => "role_to_normal",
        AttackerCommand::RoleToAttacker => "role_to_attacker",
        AttackerCommand::Exit => "exit",
        AttackerCommand::UpdateState => "update_state",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_cache::ArtifactCache;
    use attacker_types::RoleType;
    use slot_clock::ManualSlotClock;
    use std::sync::Arc;
    use std::time::Duration;
    use strategy::{RawSlotRule, StrategyFile, ValidatorWindow};
    use task_executor::TaskExecutor;

    fn dispatcher() -> Dispatcher {
        let clock = Arc::new(ManualSlotClock::new(Duration::from_secs(0), Duration::from_secs(12)));
        let (_tx, rx) = task_executor::shutdown_channel();
        let handle = tokio::runtime::Handle::current();
        let engine = Engine::new(Arc::new(ArtifactCache::new()), clock, TaskExecutor::new(handle, rx), 32, 12, 128);
        Dispatcher::new(engine)
    }

    #[tokio::test]
    async fn pure_pass_through_with_no_strategy() {
        let d = dispatcher();
        let resp = d
            .dispatch(ActionPoint::AttestBeforeSign, 50, Some("0xa"), Some(Bytes::from_static(b"X")))
            .await;
        assert_eq!(resp.cmd, AttackerCommand::Null);
        assert_eq!(resp.result, Some(HookPayload::Bytes(b"X".to_vec())));
    }

    #[tokio::test]
    async fn suppress_non_last_attacker_block() {
        let d = dispatcher();
        let mut actions = std::collections::HashMap::new();
        actions.insert("BlockBeforeSign".to_string(), "return".to_string());
        let file = StrategyFile {
            slots: vec![RawSlotRule {
                slot: "attackerSlot".to_string(),
                level: 1,
                actions,
            }],
            validators: vec![ValidatorWindow {
                validator_index: 7,
                attacker_start_slot: 0,
                attacker_end_slot: 1000,
            }],
        };
        d.engine().update_strategy(file).unwrap();
        d.engine().record_duties(1, vec![attacker_types::ProposeDuty::new(40, 7), attacker_types::ProposeDuty::new(60, 7)]);

        let matched = d.dispatch(ActionPoint::BlockBeforeSign, 40, None, None).await;
        assert_eq!(matched.cmd, AttackerCommand::Return);

        let unmatched = d.dispatch(ActionPoint::BlockBeforeSign, 59, None, None).await;
        assert_eq!(unmatched.cmd, AttackerCommand::Null);
    }

    #[tokio::test]
    async fn delay_to_epoch_end_blocks_the_caller_until_woken() {
        let d = dispatcher();
        let mut actions = std::collections::HashMap::new();
        actions.insert("BlockDelayForReceiveBlock".to_string(), "delayToEpochEnd".to_string());
        let file = StrategyFile {
            slots: vec![RawSlotRule {
                slot: "every".to_string(),
                level: 0,
                actions,
            }],
            validators: vec![],
        };
        d.engine().update_strategy(file).unwrap();
        // slot 31 is the last slot of epoch 0 at spe=32, so the wait is zero.
        let resp = d.dispatch(ActionPoint::BlockDelayForReceiveBlock, 31, None, None).await;
        assert_eq!(resp.cmd, AttackerCommand::Null);
    }

    #[tokio::test]
    async fn admin_role_override_is_visible_to_strategy_resolution() {
        let d = dispatcher();
        assert_eq!(d.engine().role_by_pubkey("0xaa", 10), RoleType::Normal);
        d.engine().cache().add_validator(3, "0xaa");
        d.set_role(3, RoleType::Attacker);
        assert_eq!(d.engine().role_by_pubkey("0xaa", 10), RoleType::Attacker);
    }
}
