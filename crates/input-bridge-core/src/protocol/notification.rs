//! Outbound notifications: local events reported to the remote side.

use serde::Serialize;

use crate::cursor::cache::{CallbackId, Classification, SubscriberOutcome};
use crate::domain::button::PointerButton;
use crate::domain::monitor::MonitorPosition;
use crate::keymap::CanonicalKeyCode;

/// An event emitted by the session, encoded as `{"method", "args"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "args")]
pub enum Notification {
    /// Raw pointer delta while the cursor is locked.
    #[serde(rename = "onCursorMoved")]
    CursorMoved { dx: f64, dy: f64 },
    #[serde(rename = "onCursorButton", rename_all = "camelCase")]
    CursorButton {
        #[serde(rename = "buttonId")]
        button: PointerButton,
        is_down: bool,
    },
    #[serde(rename = "onCursorScroll")]
    CursorScroll { dx: f64, dy: f64 },
    /// A local key transition while the cursor is locked, in canonical codes.
    #[serde(rename = "onKeyboardButton", rename_all = "camelCase")]
    KeyboardButton {
        #[serde(rename = "buttonId")]
        code: CanonicalKeyCode,
        is_down: bool,
    },
    /// A cursor-shape change, classified for one subscriber.
    #[serde(rename = "onCursorImageMessage")]
    CursorImage {
        #[serde(rename = "callbackID")]
        callback_id: CallbackId,
        #[serde(flatten)]
        classification: Classification,
    },
    /// The cursor was shown or hidden; `position` is where it was at the time
    /// and is left out when the pointer position could not be read.
    #[serde(rename = "onCursorVisibility")]
    CursorVisibility {
        #[serde(rename = "callbackID")]
        callback_id: CallbackId,
        visible: bool,
        #[serde(flatten)]
        position: Option<MonitorPosition>,
    },
}

impl From<SubscriberOutcome> for Notification {
    fn from(outcome: SubscriberOutcome) -> Self {
        Self::CursorImage {
            callback_id: outcome.callback_id,
            classification: outcome.classification,
        }
    }
}

impl Notification {
    pub fn method(&self) -> &'static str {
        match self {
            Self::CursorMoved { .. } => "onCursorMoved",
            Self::CursorButton { .. } => "onCursorButton",
            Self::CursorScroll { .. } => "onCursorScroll",
            Self::KeyboardButton { .. } => "onKeyboardButton",
            Self::CursorImage { .. } => "onCursorImageMessage",
            Self::CursorVisibility { .. } => "onCursorVisibility",
        }
    }
}
