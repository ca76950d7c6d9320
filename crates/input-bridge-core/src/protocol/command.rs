//! Inbound commands and their JSON decoding.
//!
//! Wire form:
//! ```json
//! {"method": "mouseMoveAbsolute", "args": {"x": 0.5, "y": 0.5, "monitorIndex": 0}}
//! ```
//! `args` may be omitted for commands that take none.  The legacy method
//! names `mouseMoveA`, `mouseMoveR` and `KeyPress` are accepted as aliases.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cursor::cache::CallbackId;
use crate::domain::button::PointerButton;
use crate::error::BridgeError;
use crate::keymap::CanonicalKeyCode;

/// Every method name [`decode_command`] accepts, legacy aliases included.
pub const METHOD_NAMES: &[&str] = &[
    "mouseMoveAbsolute",
    "mouseMoveA",
    "mouseMoveRelative",
    "mouseMoveR",
    "mousePress",
    "mouseScroll",
    "keyPress",
    "KeyPress",
    "lockCursor",
    "unlockCursor",
    "hookCursorImage",
    "unhookCursorImage",
    "getMonitorCount",
];

/// Methods whose `args` carry nothing.
const NO_ARG_METHODS: &[&str] = &["lockCursor", "unlockCursor", "getMonitorCount"];

/// A decoded command from the remote side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum Command {
    /// Move to a monitor-relative fraction; `(0, 0)` is the top-left corner.
    #[serde(alias = "mouseMoveA", rename_all = "camelCase")]
    MouseMoveAbsolute {
        x: f64,
        y: f64,
        /// Legacy clients send `screenId`; absent means the primary monitor.
        #[serde(default, alias = "screenId")]
        monitor_index: usize,
    },
    /// Move by a pixel delta, clamped to the monitor.
    #[serde(alias = "mouseMoveR", rename_all = "camelCase")]
    MouseMoveRelative {
        #[serde(alias = "x")]
        dx: f64,
        #[serde(alias = "y")]
        dy: f64,
        #[serde(default, alias = "screenId")]
        monitor_index: usize,
    },
    #[serde(rename_all = "camelCase")]
    MousePress {
        #[serde(rename = "buttonId")]
        button: PointerButton,
        is_down: bool,
    },
    MouseScroll { dx: f64, dy: f64 },
    #[serde(alias = "KeyPress", rename_all = "camelCase")]
    KeyPress { code: CanonicalKeyCode, is_down: bool },
    LockCursor,
    UnlockCursor,
    #[serde(rename_all = "camelCase")]
    HookCursorImage {
        #[serde(rename = "callbackID")]
        callback_id: CallbackId,
        #[serde(default)]
        hook_all: bool,
    },
    UnhookCursorImage {
        #[serde(rename = "callbackID")]
        callback_id: CallbackId,
    },
    GetMonitorCount,
}

impl Command {
    /// Canonical method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::MouseMoveAbsolute { .. } => "mouseMoveAbsolute",
            Self::MouseMoveRelative { .. } => "mouseMoveRelative",
            Self::MousePress { .. } => "mousePress",
            Self::MouseScroll { .. } => "mouseScroll",
            Self::KeyPress { .. } => "keyPress",
            Self::LockCursor => "lockCursor",
            Self::UnlockCursor => "unlockCursor",
            Self::HookCursorImage { .. } => "hookCursorImage",
            Self::UnhookCursorImage { .. } => "unhookCursorImage",
            Self::GetMonitorCount => "getMonitorCount",
        }
    }

    fn validate(self) -> Result<Self, BridgeError> {
        if let Self::MouseMoveAbsolute { x, y, .. } = self {
            for (name, v) in [("x", x), ("y", y)] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(BridgeError::Decode(format!(
                        "field `{name}` must be within [0, 1], got {v}"
                    )));
                }
            }
        }
        Ok(self)
    }
}

/// Parses one line of JSON and decodes it as a command.
///
/// # Errors
///
/// Returns [`BridgeError::Decode`] for invalid JSON, plus everything
/// [`decode_command`] can return.
pub fn decode_command_str(text: &str) -> Result<Command, BridgeError> {
    let value: Value = serde_json::from_str(text).map_err(|e| BridgeError::Decode(e.to_string()))?;
    decode_command(&value)
}

/// Decodes a `{"method", "args"}` envelope.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedCommand`] for an unknown method name and
/// [`BridgeError::Decode`] for a malformed envelope or argument.
pub fn decode_command(value: &Value) -> Result<Command, BridgeError> {
    let envelope = value
        .as_object()
        .ok_or_else(|| BridgeError::Decode("command must be a JSON object".to_string()))?;
    let method = envelope
        .get("method")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::Decode("missing string field `method`".to_string()))?;
    if !METHOD_NAMES.contains(&method) {
        return Err(BridgeError::UnsupportedCommand(method.to_string()));
    }

    let mut envelope = envelope.clone();
    match envelope.get("args") {
        None | Some(Value::Object(_)) => {}
        Some(Value::Null) => {
            envelope.remove("args");
        }
        Some(_) => return Err(BridgeError::Decode("`args` must be an object".to_string())),
    }
    if NO_ARG_METHODS.contains(&method) {
        envelope.remove("args");
    }

    let command: Command = serde_json::from_value(Value::Object(envelope))
        .map_err(|e| BridgeError::Decode(e.to_string()))?;
    command.validate()
}
