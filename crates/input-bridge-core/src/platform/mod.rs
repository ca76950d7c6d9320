//! The OS seam: everything the bridge needs from the local machine.
//!
//! The core never calls an OS API directly.  Injection, pointer queries,
//! capture toggles, and cursor-image enumeration all go through
//! [`InputPlatform`], so the session logic runs unchanged against a real
//! backend, the in-memory [`mock::RecordingPlatform`], or a `mockall` mock in
//! unit tests.

pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::well_known::WellKnownCursor;
use crate::cursor::CursorSnapshot;
use crate::domain::button::{MotionKind, PointerButton};
use crate::domain::mapper::{PointerQuery, VerticalOrigin};
use crate::domain::monitor::{MonitorLayout, PhysicalPoint};
use crate::keymap::NativeKeyCode;

/// Failure reported by a platform backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlatformError {
    /// The facility does not exist or is not permitted on this machine.
    #[error("platform facility unavailable: {0}")]
    Unavailable(String),
    /// The OS rejected a synthetic input event.
    #[error("input injection failed: {0}")]
    InjectionFailed(String),
}

/// The platform family whose native key codes and vertical convention apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Macos,
    X11,
    Windows,
}

impl PlatformKind {
    /// Vertical convention of the platform's injection API.
    pub const fn vertical_origin(self) -> VerticalOrigin {
        match self {
            Self::Macos => VerticalOrigin::BottomLeft,
            Self::X11 | Self::Windows => VerticalOrigin::TopLeft,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::X11 => "x11",
            Self::Windows => "windows",
        }
    }
}

/// One key transition in native terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInjection {
    pub native: NativeKeyCode,
    pub pressed: bool,
    /// Windows only: inject with `KEYEVENTF_EXTENDEDKEY`.
    pub extended: bool,
}

/// Handle to an active raw-delta subscription.
///
/// Not `Clone`: the handle is surrendered on unsubscribe.
#[derive(Debug, PartialEq, Eq)]
pub struct DeltaSubscription(u64);

impl DeltaSubscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Everything the bridge needs from the local OS.
///
/// Pointer positions are in canonical (top-left) space except for
/// [`inject_pointer_motion`](Self::inject_pointer_motion), which receives the
/// point already converted to the platform's native vertical convention.
#[cfg_attr(test, mockall::automock)]
pub trait InputPlatform: Send + Sync {
    /// Current monitor configuration.
    fn monitors(&self) -> Result<MonitorLayout, PlatformError>;

    fn cursor_position(&self) -> Result<PhysicalPoint, PlatformError>;

    /// The mouse button currently held down, if any.
    fn pressed_button(&self) -> Option<PointerButton>;

    fn inject_pointer_motion(
        &self,
        point: PhysicalPoint,
        kind: MotionKind,
    ) -> Result<(), PlatformError>;

    fn inject_button(&self, button: PointerButton, pressed: bool) -> Result<(), PlatformError>;

    fn inject_scroll(&self, dx: f64, dy: f64) -> Result<(), PlatformError>;

    fn inject_key(&self, key: KeyInjection) -> Result<(), PlatformError>;

    /// Detaches (or re-attaches) the on-screen pointer from physical mouse motion.
    fn set_pointer_decoupled(&self, decoupled: bool) -> Result<(), PlatformError>;

    fn set_cursor_visible(&self, visible: bool) -> Result<(), PlatformError>;

    /// Starts delivery of raw mouse deltas to the session.
    fn subscribe_raw_deltas(&self) -> Result<DeltaSubscription, PlatformError>;

    fn unsubscribe_raw_deltas(&self, subscription: DeltaSubscription) -> Result<(), PlatformError>;

    /// Starts delivery of cursor-shape change notifications.
    fn subscribe_cursor_changes(&self) -> Result<(), PlatformError>;

    fn unsubscribe_cursor_changes(&self) -> Result<(), PlatformError>;

    /// Images of the platform's stock cursors, used to seed the well-known cache region.
    fn system_cursors(&self) -> Vec<(WellKnownCursor, CursorSnapshot)>;
}

impl<T: InputPlatform + ?Sized> PointerQuery for T {
    fn pressed_button(&self) -> Option<PointerButton> {
        InputPlatform::pressed_button(self)
    }

    fn cursor_position(&self) -> Result<PhysicalPoint, PlatformError> {
        InputPlatform::cursor_position(self)
    }
}
