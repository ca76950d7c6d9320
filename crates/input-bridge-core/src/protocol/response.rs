//! Command results and their JSON responses.

use serde_json::{json, Value};

use crate::error::BridgeError;
use crate::protocol::notification::Notification;

/// The value a successful command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyValue {
    #[default]
    Unit,
    MonitorCount(usize),
}

/// Outcome of a successful command.
///
/// Some commands emit notifications as a side effect (a hook-all
/// subscription delivers the current cursor immediately); they are sent
/// after the response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandReply {
    pub value: ReplyValue,
    pub notifications: Vec<Notification>,
}

impl CommandReply {
    pub fn unit() -> Self {
        Self::default()
    }

    pub fn with_value(value: ReplyValue) -> Self {
        Self {
            value,
            notifications: Vec::new(),
        }
    }

    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        Self {
            value: ReplyValue::Unit,
            notifications,
        }
    }
}

/// Encodes a command result as `{"ok": true, "result": ...}` or
/// `{"ok": false, "error": {"kind", "message"}}`.
pub fn encode_response(result: &Result<CommandReply, BridgeError>) -> Value {
    match result {
        Ok(reply) => {
            let value = match reply.value {
                ReplyValue::Unit => Value::Null,
                ReplyValue::MonitorCount(n) => json!(n),
            };
            json!({ "ok": true, "result": value })
        }
        Err(err) => json!({
            "ok": false,
            "error": { "kind": err.kind(), "message": err.to_string() },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_reply_encodes_null_result() {
        let value = encode_response(&Ok(CommandReply::unit()));
        assert_eq!(value, json!({"ok": true, "result": null}));
    }

    #[test]
    fn test_monitor_count_reply_encodes_number() {
        let value = encode_response(&Ok(CommandReply::with_value(ReplyValue::MonitorCount(3))));
        assert_eq!(value["result"], 3);
    }

    #[test]
    fn test_unsupported_command_encodes_not_implemented() {
        // Arrange
        let result = Err(BridgeError::UnsupportedCommand("getPlatformVersion".to_string()));

        // Act
        let value = encode_response(&result);

        // Assert
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["kind"], "notImplemented");
        assert_eq!(value["error"]["message"], "unsupported command: getPlatformVersion");
    }
}
