//! The `attest.*` namespace (spec.md §6), grounded on
//! `server/apis/attest.go`'s `AttestAPI`: each method resolves the
//! strategy-driven action for its point and runs it through the
//! dispatcher, decoding/encoding payloads at the RPC edge.

use crate::wire;
use attacker_types::ActionPoint;
use hook_engine::Dispatcher;
use jsonrpc_core::{IoHandler, Params};

pub fn register(io: &mut IoHandler, dispatcher: Dispatcher) {
    slot_only(io, dispatcher.clone(), "attest.BeforeBroadCast", ActionPoint::AttestBeforeBroadCast);
    slot_only(io, dispatcher.clone(), "attest.AfterBroadCast", ActionPoint::AttestAfterBroadCast);
    with_payload(io, dispatcher.clone(), "attest.BeforeSign", ActionPoint::AttestBeforeSign);
    with_payload(io, dispatcher.clone(), "attest.AfterSign", ActionPoint::AttestAfterSign);
    with_payload(io, dispatcher.clone(), "attest.BeforePropose", ActionPoint::AttestBeforePropose);
    with_payload(io, dispatcher, "attest.AfterPropose", ActionPoint::AttestAfterPropose);
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
    async fn registered_methods_respond_to_a_call() {
        let mut io = IoHandler::new();
        register(&mut io, dispatcher());
        let request = json!({"jsonrpc": "2.0", "method": "attest.BeforeBroadCast", "params": [5], "id": 1}).to_string();
        let response = io.handle_request(&request).await.unwrap();
        assert!(response.contains("\"cmd\":0"));
    }

    #[tokio::test]
    async fn malformed_payload_passes_through_without_dispatch() {
        let mut io = IoHandler::new();
        register(&mut io, dispatcher());
        let request = json!({
            "jsonrpc": "2.0",
            "method": "attest.BeforeSign",
            "params": [5, "0xaa", "not base64!!"],
            "id": 1,
        })
        .to_string();
        let response = io.handle_request(&request).await.unwrap();
        assert!(response.contains("\"result\":\"not base64!!\""));
    }
}
