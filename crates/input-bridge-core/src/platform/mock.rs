//! In-memory platform that records every call.
//!
//! `RecordingPlatform` stands in for a real OS backend.  Each injected event
//! is pushed into a `Mutex<Vec<...>>` so that callers can inspect exactly
//! what was emitted and in what order; the host binary uses it as its
//! simulated platform and logs what it would have injected.
//!
//! The platform also keeps a simulated pointer: injected motion moves it, and
//! [`cursor_position`](InputPlatform::cursor_position) reports it back in
//! canonical coordinates, so relative moves behave as on a real desktop.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` to make every fallible method return
//! [`PlatformError::InjectionFailed`].  Nothing is recorded while failing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cursor::well_known::WellKnownCursor;
use crate::cursor::CursorSnapshot;
use crate::domain::button::{MotionKind, PointerButton};
use crate::domain::mapper::VerticalOrigin;
use crate::domain::monitor::{MonitorLayout, PhysicalPoint};
use crate::platform::{DeltaSubscription, InputPlatform, KeyInjection, PlatformError};

/// A platform that records all calls without touching the OS.
#[derive(Default)]
pub struct RecordingPlatform {
    /// Native points and motion kinds passed to `inject_pointer_motion`.
    pub motions: Mutex<Vec<(PhysicalPoint, MotionKind)>>,
    /// `(button, pressed)` pairs from `inject_button`.
    pub buttons: Mutex<Vec<(PointerButton, bool)>>,
    /// `(dx, dy)` pairs from `inject_scroll`.
    pub scrolls: Mutex<Vec<(f64, f64)>>,
    pub keys: Mutex<Vec<KeyInjection>>,
    /// Every value passed to `set_pointer_decoupled`, in call order.
    pub decoupled_calls: Mutex<Vec<bool>>,
    /// Every value passed to `set_cursor_visible`, in call order.
    pub visibility_calls: Mutex<Vec<bool>>,
    /// Ids of the raw-delta subscriptions currently active.
    pub active_delta_subscriptions: Mutex<Vec<u64>>,
    pub cursor_changes_subscribed: AtomicBool,
    /// When `true`, every fallible method fails with `InjectionFailed`.
    pub should_fail: bool,
    layout: Mutex<MonitorLayout>,
    position: Mutex<PhysicalPoint>,
    pressed: Mutex<Option<PointerButton>>,
    native_origin: VerticalOrigin,
    system_cursors: Vec<(WellKnownCursor, CursorSnapshot)>,
    next_subscription: AtomicU64,
}

impl RecordingPlatform {
    /// A single 1920x1080 monitor with the pointer at the origin.
    pub fn new() -> Self {
        Self::with_layout(MonitorLayout::single(1920, 1080))
    }

    pub fn with_layout(layout: MonitorLayout) -> Self {
        Self {
            layout: Mutex::new(layout),
            ..Self::default()
        }
    }

    /// Interprets injected points in the given native vertical convention.
    pub fn with_native_origin(mut self, origin: VerticalOrigin) -> Self {
        self.native_origin = origin;
        self
    }

    /// Stock cursor images reported by `system_cursors`.
    pub fn with_system_cursors(mut self, cursors: Vec<(WellKnownCursor, CursorSnapshot)>) -> Self {
        self.system_cursors = cursors;
        self
    }

    /// Replaces the layout returned by `monitors`.
    pub fn set_layout(&self, layout: MonitorLayout) {
        *lock(&self.layout) = layout;
    }

    /// Moves the simulated pointer (canonical coordinates).
    pub fn set_position(&self, point: PhysicalPoint) {
        *lock(&self.position) = point;
    }

    /// Sets the button reported as held down.
    pub fn set_pressed(&self, button: Option<PointerButton>) {
        *lock(&self.pressed) = button;
    }

    pub fn is_delta_subscribed(&self) -> bool {
        !lock(&self.active_delta_subscriptions).is_empty()
    }

    /// `true` when the last `set_cursor_visible` call hid the cursor.
    pub fn is_cursor_hidden(&self) -> bool {
        lock(&self.visibility_calls).last() == Some(&false)
    }

    /// Number of events injected so far, of any kind.
    pub fn injected_count(&self) -> usize {
        lock(&self.motions).len()
            + lock(&self.buttons).len()
            + lock(&self.scrolls).len()
            + lock(&self.keys).len()
    }

    fn check(&self) -> Result<(), PlatformError> {
        if self.should_fail {
            return Err(PlatformError::InjectionFailed("mock failure".into()));
        }
        Ok(())
    }

    fn to_canonical(&self, point: PhysicalPoint) -> PhysicalPoint {
        match self.native_origin {
            VerticalOrigin::TopLeft => point,
            VerticalOrigin::BottomLeft => {
                let reference = lock(&self.layout).reference().map_or(0.0, |m| f64::from(m.height));
                PhysicalPoint::new(point.x, reference - point.y)
            }
        }
    }
}

impl InputPlatform for RecordingPlatform {
    fn monitors(&self) -> Result<MonitorLayout, PlatformError> {
        self.check()?;
        Ok(lock(&self.layout).clone())
    }

    fn cursor_position(&self) -> Result<PhysicalPoint, PlatformError> {
        self.check()?;
        Ok(*lock(&self.position))
    }

    fn pressed_button(&self) -> Option<PointerButton> {
        *lock(&self.pressed)
    }

    fn inject_pointer_motion(
        &self,
        point: PhysicalPoint,
        kind: MotionKind,
    ) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.motions).push((point, kind));
        let canonical = self.to_canonical(point);
        self.set_position(canonical);
        Ok(())
    }

    fn inject_button(&self, button: PointerButton, pressed: bool) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.buttons).push((button, pressed));
        let mut held = lock(&self.pressed);
        if pressed {
            *held = Some(button);
        } else if *held == Some(button) {
            *held = None;
        }
        Ok(())
    }

    fn inject_scroll(&self, dx: f64, dy: f64) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.scrolls).push((dx, dy));
        Ok(())
    }

    fn inject_key(&self, key: KeyInjection) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.keys).push(key);
        Ok(())
    }

    fn set_pointer_decoupled(&self, decoupled: bool) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.decoupled_calls).push(decoupled);
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.visibility_calls).push(visible);
        Ok(())
    }

    fn subscribe_raw_deltas(&self) -> Result<DeltaSubscription, PlatformError> {
        self.check()?;
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed) + 1;
        lock(&self.active_delta_subscriptions).push(id);
        Ok(DeltaSubscription::new(id))
    }

    fn unsubscribe_raw_deltas(&self, subscription: DeltaSubscription) -> Result<(), PlatformError> {
        self.check()?;
        lock(&self.active_delta_subscriptions).retain(|&id| id != subscription.id());
        Ok(())
    }

    fn subscribe_cursor_changes(&self) -> Result<(), PlatformError> {
        self.check()?;
        self.cursor_changes_subscribed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn unsubscribe_cursor_changes(&self) -> Result<(), PlatformError> {
        self.check()?;
        self.cursor_changes_subscribed.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn system_cursors(&self) -> Vec<(WellKnownCursor, CursorSnapshot)> {
        self.system_cursors.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
