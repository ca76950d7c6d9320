//! Error type shared by every bridge operation.

use thiserror::Error;

use crate::platform::PlatformError;

/// Errors reported to the caller of a single command or platform event.
///
/// Every variant is recovered at the boundary of the call that produced it;
/// none leaves the cache, capture state, or mapper half-updated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BridgeError {
    /// A native or canonical key code has no counterpart; the event is dropped.
    #[error("unmapped key code 0x{code:X}")]
    UnmappedKey { code: u32 },

    /// A command referenced a monitor outside the current layout.
    #[error("monitor index {index} out of range (layout has {count} monitors)")]
    InvalidMonitorIndex { index: usize, count: usize },

    /// A monitor layout was empty or described a degenerate monitor.
    #[error("invalid monitor layout: {0}")]
    InvalidLayout(String),

    /// A cursor image had no readable pixel data; the previous classification stands.
    #[error("malformed cursor snapshot: {0}")]
    MalformedSnapshot(String),

    /// An inbound command was missing a field or carried a mistyped value.
    #[error("failed to decode command: {0}")]
    Decode(String),

    /// An inbound command name is not recognised.
    #[error("unsupported command: {0}")]
    UnsupportedCommand(String),

    /// The platform collaborator refused or failed an operation.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl BridgeError {
    /// Short machine-readable kind used in channel error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnmappedKey { .. } => "unmappedKey",
            Self::InvalidMonitorIndex { .. } => "invalidMonitorIndex",
            Self::InvalidLayout(_) => "invalidLayout",
            Self::MalformedSnapshot(_) => "malformedSnapshot",
            Self::Decode(_) => "decodeError",
            Self::UnsupportedCommand(_) => "notImplemented",
            Self::Platform(_) => "platformError",
        }
    }
}
