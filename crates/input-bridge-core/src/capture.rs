//! Pointer capture: decoupling the local pointer and forwarding raw deltas.
//!
//! While locked, the on-screen pointer is frozen and hidden and the platform
//! delivers raw mouse deltas, which the session forwards as
//! `onCursorMoved` notifications.

use tracing::{info, warn};

use crate::error::BridgeError;
use crate::platform::{DeltaSubscription, InputPlatform};
use crate::protocol::notification::Notification;

/// Capture state. The subscription handle lives inside `Locked`.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum CaptureState {
    #[default]
    Idle,
    Locked(DeltaSubscription),
}

/// Drives the Idle/Locked state machine.
#[derive(Debug, Default)]
pub struct CaptureController {
    state: CaptureState,
}

impl CaptureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, CaptureState::Locked(_))
    }

    /// Decouples and hides the pointer, then subscribes to raw deltas.
    ///
    /// A no-op when already locked.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Platform`] if any step fails.  Steps already
    /// applied are undone and the controller stays `Idle`.
    pub fn lock<P: InputPlatform + ?Sized>(&mut self, platform: &P) -> Result<(), BridgeError> {
        if self.is_locked() {
            return Ok(());
        }

        platform.set_pointer_decoupled(true)?;

        if let Err(e) = platform.set_cursor_visible(false) {
            restore_pointer(platform, false);
            return Err(e.into());
        }

        let subscription = match platform.subscribe_raw_deltas() {
            Ok(sub) => sub,
            Err(e) => {
                restore_pointer(platform, true);
                return Err(e.into());
            }
        };

        info!(subscription = subscription.id(), "cursor locked");
        self.state = CaptureState::Locked(subscription);
        Ok(())
    }

    /// Re-couples and shows the pointer and surrenders the delta subscription.
    ///
    /// A no-op when idle.  All three steps are attempted and the controller
    /// is `Idle` afterwards even if one of them fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`BridgeError::Platform`] encountered.
    pub fn unlock<P: InputPlatform + ?Sized>(&mut self, platform: &P) -> Result<(), BridgeError> {
        let CaptureState::Locked(subscription) = std::mem::take(&mut self.state) else {
            return Ok(());
        };
        let id = subscription.id();

        let results = [
            platform.set_pointer_decoupled(false),
            platform.set_cursor_visible(true),
            platform.unsubscribe_raw_deltas(subscription),
        ];
        info!(subscription = id, "cursor unlocked");

        results.into_iter().collect::<Result<Vec<()>, _>>()?;
        Ok(())
    }

    /// Turns a raw delta into a notification, but only while locked.
    pub fn forward_delta(&self, dx: f64, dy: f64) -> Option<Notification> {
        self.is_locked().then_some(Notification::CursorMoved { dx, dy })
    }
}

fn restore_pointer<P: InputPlatform + ?Sized>(platform: &P, was_hidden: bool) {
    if was_hidden {
        if let Err(e) = platform.set_cursor_visible(true) {
            warn!("failed to re-show cursor during lock rollback: {e}");
        }
    }
    if let Err(e) = platform.set_pointer_decoupled(false) {
        warn!("failed to re-couple pointer during lock rollback: {e}");
    }
}
