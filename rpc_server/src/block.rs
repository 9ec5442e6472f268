//! The `block.*` namespace (spec.md §6), grounded on
//! `server/apis/block.go`'s `BlockAPI`. Nine methods total; seven route
//! through the dispatcher's 13-point closed set (component C10), and two
//! — `BroadCastDelay` and `GetNewParentRoot` — do not: the Go original
//! keys their action-table lookup with names (`BlockDelayForBroadCast`,
//! `BlockGetNewParentRoot`) that `types.CheckActionPointExist` never
//! recognizes, so a strategy document can never populate them and the
//! lookup always misses. They stay on the wire as always-pass-through
//! methods rather than as dead entries in `ActionPoint`.

use crate::wire;
use attacker_types::ActionPoint;
use hook_engine::Dispatcher;
use jsonrpc_core::{IoHandler, Params};

pub fn register(io: &mut IoHandler, dispatcher: Dispatcher) {
    slot_only(io, dispatcher.clone(), "block.DelayForReceiveBlock", ActionPoint::BlockDelayForReceiveBlock);
    slot_only(io, dispatcher.clone(), "block.BeforeBroadCast", ActionPoint::BlockBeforeBroadCast);
    slot_only(io, dispatcher.clone(), "block.AfterBroadCast", ActionPoint::BlockAfterBroadCast);
    with_payload(io, dispatcher.clone(), "block.BeforeSign", ActionPoint::BlockBeforeSign);
    with_payload(io, dispatcher.clone(), "block.AfterSign", ActionPoint::BlockAfterSign);
    with_payload(io, dispatcher.clone(), "block.BeforePropose", ActionPoint::BlockBeforePropose);
    with_payload(io, dispatcher, "block.AfterPropose", ActionPoint::BlockAfterPropose);

    io.add_method("block.BroadCastDelay", move |params: Params| async move {
        let (slot,): (u64,) = params.parse().map_err(|_| wire::invalid_params("expected (slot)"))?;
        tracing::debug!(slot, "block.BroadCastDelay: action point outside the validated set, passing through");
        Ok(wire::passthrough(None))
    });

    io.add_method("block.GetNewParentRoot", move |params: Params| async move {
        let (slot, _pubkey, parent_root): (u64, String, String) = params
            .parse()
            .map_err(|_| wire::invalid_params("expected (slot, pubkey, parent_root_hex)"))?;
        tracing::debug!(slot, "block.GetNewParentRoot: action point outside the validated set, passing through");
        Ok(wire::passthrough_text(parent_root))
    });
}

fn slot_only(io: &mut IoHandler, dispatcher: Dispatcher, name: &'static str, point: ActionPoint) {
    io.add_method(name, move |params: Params| {
        let dispatcher = dispatcher.clone();
        async move {
            let (slot,): (u64,) = params.parse().map_err(|_| wire::invalid_params("expected (slot)"))?;
            let resp = dispatcher.dispatch(point, slot as i64, None, None).await;
            Ok(wire::encode_response(resp))
        }
    });
}

fn with_payload(io: &mut IoHandler, dispatcher: Dispatcher, name: &'static str, point: ActionPoint) {
    io.add_method(name, move |params: Params| {
        let dispatcher = dispatcher.clone();
        async move {
            let (slot, pubkey, payload): (u64, String, String) = params
                .parse()
                .map_err(|_| wire::invalid_params("expected (slot, pubkey, payload_b64)"))?;
            let decoded = match wire::decode_payload(Some(&payload)) {
                Ok(d) => d,
                Err(()) => return Ok(wire::passthrough(Some(payload))),
            };
            let resp = dispatcher.dispatch(point, slot as i64, Some(&pubkey), decoded).await;
            Ok(wire::encode_response(resp))
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
    async fn broadcast_delay_always_passes_through() {
        let mut io = IoHandler::new();
        register(&mut io, dispatcher());
        let request = json!({"jsonrpc": "2.0", "method": "block.BroadCastDelay", "params": [100], "id": 1}).to_string();
        let response = io.handle_request(&request).await.unwrap();
        assert!(response.contains("\"cmd\":0"));
    }

    #[tokio::test]
    async fn get_new_parent_root_echoes_the_input_root() {
        let mut io = IoHandler::new();
        register(&mut io, dispatcher());
        let request = json!({
            "jsonrpc": "2.0",
            "method": "block.GetNewParentRoot",
            "params": [100, "0xaa", "0xdeadbeef"],
            "id": 1,
        })
        .to_string();
        let response = io.handle_request(&request).await.unwrap();
        assert!(response.contains("\"result\":\"0xdeadbeef\""));
    }

    #[tokio::test]
    async fn delay_for_receive_block_records_slot_start() {
        let d = dispatcher();
        let mut io = IoHandler::new();
        register(&mut io, d.clone());
        let request = json!({"jsonrpc": "2.0", "method": "block.DelayForReceiveBlock", "params": [7], "id": 1}).to_string();
        io.handle_request(&request).await.unwrap();
        assert!(d.engine().slot_start(7).is_some());
    }
}
