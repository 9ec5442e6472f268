//! Wire-level `AttackerCommand` values (spec.md §6) and the payload envelope
//! returned from every hook dispatch.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum AttackerCommand {
    Null = 0,
    Continue = 1,
    Return = 2,
    Abort = 3,
    Skip = 4,
    RoleToNormal = 5,
    RoleToAttacker = 6,
    Exit = 7,
    UpdateState = 8,
}

impl Default for AttackerCommand {
    fn default() -> Self {
        AttackerCommand::Null
    }
}

/// Payload carried alongside a command: either an opaque byte blob (base64
/// on the wire) or, rarely, a plain string (e.g. a rewritten parent root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookPayload {
    Bytes(Vec<u8>),
    Text(String),
}

/// The response every hook call returns, regardless of what happened
/// internally (spec.md §7 propagation policy: never raise to the caller).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginResponse {
    pub cmd: AttackerCommand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<HookPayload>,
}

impl PluginResponse {
    pub fn null() -> Self {
        PluginResponse {
            cmd: AttackerCommand::Null,
            result: None,
        }
    }

    pub fn pass_through(payload: Option<Vec<u8>>) -> Self {
        PluginResponse {
            cmd: AttackerCommand::Null,
            result: payload.map(HookPayload::Bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_null() {
        assert_eq!(AttackerCommand::default(), AttackerCommand::Null);
    }

    #[test]
    fn pass_through_carries_original_bytes() {
        let resp = PluginResponse::pass_through(Some(vec![1, 2, 3]));
        assert_eq!(resp.cmd, AttackerCommand::Null);
        assert_eq!(resp.result, Some(HookPayload::Bytes(vec![1, 2, 3])));
    }

    #[test]
    fn pass_through_none_payload() {
        let resp = PluginResponse::pass_through(None);
        assert_eq!(resp.result, None);
    }
}
