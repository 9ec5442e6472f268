//! Wire encode/decode for the hook RPC surface (spec.md §6): payloads
//! travel as base64 over the wire and as opaque `Bytes` once inside
//! `hook_engine`, mirroring the Go service's per-handler
//! `common.Base64To*`/`*ToBase64` calls rather than a single generic codec.

use attacker_types::{AttackerCommand, HookPayload, PluginResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use jsonrpc_core::{Error, ErrorCode, Value};
use serde_json::json;

/// Decodes an incoming base64 payload. `None` in, `Ok(None)` out; a
/// malformed string is reported so the caller can short-circuit to a
/// pass-through response instead of invoking the dispatcher (spec.md §7's
/// `DecodeError` policy: `{Null, original_payload}`, never a failed call).
pub fn decode_payload(payload: Option<&str>) -> Result<Option<Bytes>, ()> {
    match payload {
        None => Ok(None),
        Some(b64) => BASE64.decode(b64).map(|bytes| Some(Bytes::from(bytes))).map_err(|_| ()),
    }
}

/// A response built without ever touching the dispatcher: the original b64
/// payload comes back unchanged under `Null`.
pub fn passthrough(payload_b64: Option<String>) -> Value {
    json!({ "cmd": AttackerCommand::Null as i32, "result": payload_b64 })
}

/// A response carrying a fixed text result (e.g. `block.GetNewParentRoot`'s
/// unchanged parent root) without consulting the dispatcher at all.
pub fn passthrough_text(text: String) -> Value {
    json!({ "cmd": AttackerCommand::Null as i32, "result": text })
}

pub fn encode_response(resp: PluginResponse) -> Value {
    let result = resp.result.map(|payload| match payload {
        HookPayload::Bytes(bytes) => BASE64.encode(bytes),
        HookPayload::Text(text) => text,
    });
    json!({ "cmd": resp.cmd as i32, "result": result })
}

pub fn invalid_params(message: impl Into<String>) -> Error {
    Error {
        code: ErrorCode::InvalidParams,
        message: message.into(),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_roundtrips_through_encode() {
        let encoded = BASE64.encode(b"hello");
        let decoded = decode_payload(Some(&encoded)).unwrap().unwrap();
        assert_eq!(decoded, Bytes::from_static(b"hello"));
    }

    #[test]
    fn malformed_base64_is_rejected() {
        assert!(decode_payload(Some("not base64!!")).is_err());
    }

    #[test]
    fn none_payload_decodes_to_none() {
        assert_eq!(decode_payload(None).unwrap(), None);
    }

    #[test]
    fn passthrough_echoes_the_original_string() {
        let value = passthrough(Some("abc".to_string()));
        assert_eq!(value["cmd"], 0);
        assert_eq!(value["result"], "abc");
    }
}
