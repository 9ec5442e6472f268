//! The `admin.*` namespace (spec.md §6), grounded on
//! `server/apis/roles.go`'s `AdminAPI`. Unlike the Go original — whose
//! `SetRoleAttacker`/`SetRoleNormal` bodies are commented out — these
//! write directly into `Engine`'s role-override map, since that map
//! (and the precedence it takes over the strategy's validator windows)
//! exists specifically to make these two calls observable.

use crate::wire;
use attacker_types::RoleType;
use hook_engine::Dispatcher;
use jsonrpc_core::{IoHandler, Params, Value};

pub fn register(io: &mut IoHandler, dispatcher: Dispatcher) {
    let d = dispatcher.clone();
    io.add_method("admin.SetRoleAttacker", move |params: Params| {
        let d = d.clone();
        async move {
            let (validator_index,): (i64,) = params.parse().map_err(|_| wire::invalid_params("expected (validator_index)"))?;
            d.set_role(validator_index, RoleType::Attacker);
            Ok(Value::Null)
        }
    });

    io.add_method("admin.SetRoleNormal", move |params: Params| {
        let dispatcher = dispatcher.clone();
        async move {
            let (validator_index,): (i64,) = params.parse().map_err(|_| wire::invalid_params("expected (validator_index)"))?;
            dispatcher.set_role(validator_index, RoleType::Normal);
            Ok(Value::Null)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_cache::ArtifactCache;
    use hook_engine::Engine;
    use serde_json::json;
    use slot_clock::ManualSlotClock;
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher() -> Dispatcher {
        let clock = Arc::new(ManualSlotClock::new(Duration::from_secs(0), Duration::from_secs(12)));
        let (_tx, rx) = task_executor::shutdown_channel();
        let handle = tokio::runtime::Handle::current();
        let engine = Engine::new(Arc::new(ArtifactCache::new()), clock, task_executor::TaskExecutor::new(handle, rx), 32, 12, 128);
        Dispatcher::new(engine)
    }

    #[tokio::test]
    async fn set_role_attacker_is_visible_through_the_engine() {
        let d = dispatcher();
        d.engine().cache().add_validator(3, "0xaa");
        let mut io = IoHandler::new();
        register(&mut io, d.clone());

        let request = json!({"jsonrpc": "2.0", "method": "admin.SetRoleAttacker", "params": [3], "id": 1}).to_string();
        io.handle_request(&request).await.unwrap();
        assert_eq!(d.engine().role_by_pubkey("0xaa", 10), RoleType::Attacker);
    }

    #[tokio::test]
    async fn set_role_normal_clears_back_to_default() {
        let d = dispatcher();
        d.engine().cache().add_validator(4, "0xbb");
        d.set_role(4, RoleType::Attacker);
        let mut io = IoHandler::new();
        register(&mut io, d.clone());

        let request = json!({"jsonrpc": "2.0", "method": "admin.SetRoleNormal", "params": [4], "id": 1}).to_string();
        io.handle_request(&request).await.unwrap();
        assert_eq!(d.engine().role_by_pubkey("0xbb", 10), RoleType::Normal);
    }
}
