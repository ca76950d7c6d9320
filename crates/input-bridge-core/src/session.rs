//! The bridge session: command dispatch and platform event handling.
//!
//! [`BridgeSession`] owns every piece of mutable bridge state (key table,
//! coordinate mapper, cursor cache, capture state, monitor layout) and is
//! driven through `&mut self`.  [`SharedBridge`] wraps it in a single mutex
//! for hosts that deliver commands and platform events from different
//! threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::capture::CaptureController;
use crate::cursor::cache::{CallbackId, CursorClassification, CursorIdentityCache};
use crate::cursor::{CursorSnapshot, RawCursorImage};
use crate::domain::button::PointerButton;
use crate::domain::mapper::{CoordinateMapper, MappedMotion, VerticalOrigin};
use crate::domain::monitor::MonitorLayout;
use crate::error::BridgeError;
use crate::keymap::{windows_vk, CanonicalKeyCode, KeyCodeTable, NativeKeyCode};
use crate::platform::{InputPlatform, KeyInjection, PlatformKind};
use crate::protocol::command::Command;
use crate::protocol::notification::Notification;
use crate::protocol::response::{CommandReply, ReplyValue};

/// Construction options for a [`BridgeSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    /// Selects the key table and the extended-key rule.
    pub platform: PlatformKind,
    pub vertical_origin: VerticalOrigin,
    /// Carry sub-pixel remainders between relative moves.
    pub accumulate_subpixel: bool,
}

impl SessionOptions {
    /// Options matching the native conventions of `platform`.
    pub fn for_platform(platform: PlatformKind) -> Self {
        Self {
            platform,
            vertical_origin: platform.vertical_origin(),
            accumulate_subpixel: false,
        }
    }
}

/// Single-threaded bridge state machine.
pub struct BridgeSession {
    platform: Arc<dyn InputPlatform>,
    kind: PlatformKind,
    keys: KeyCodeTable,
    mapper: CoordinateMapper,
    cursors: CursorIdentityCache,
    capture: CaptureController,
    layout: MonitorLayout,
    cursor_visible: bool,
}

impl BridgeSession {
    /// Reads the initial monitor layout and stock cursor set from `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Platform`] if the monitor layout cannot be read.
    pub fn new(
        platform: Arc<dyn InputPlatform>,
        options: SessionOptions,
    ) -> Result<Self, BridgeError> {
        let layout = platform.monitors()?;
        let cursors = CursorIdentityCache::with_system_cursors(platform.system_cursors());
        let mut mapper = CoordinateMapper::new(options.vertical_origin);
        if options.accumulate_subpixel {
            mapper = mapper.with_accumulator();
        }

        info!(
            platform = options.platform.name(),
            monitors = layout.len(),
            well_known_cursors = cursors.well_known_len(),
            "bridge session started"
        );

        Ok(Self {
            platform,
            kind: options.platform,
            keys: KeyCodeTable::for_platform(options.platform),
            mapper,
            cursors,
            capture: CaptureController::new(),
            layout,
            cursor_visible: true,
        })
    }

    pub fn platform_kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn layout(&self) -> &MonitorLayout {
        &self.layout
    }

    pub fn is_locked(&self) -> bool {
        self.capture.is_locked()
    }

    pub fn cursor_cache(&self) -> &CursorIdentityCache {
        &self.cursors
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Any [`BridgeError`]; no injection has happened when a mapping or
    /// translation step fails.
    pub fn execute(&mut self, command: Command) -> Result<CommandReply, BridgeError> {
        let method = command.method();
        let result = self.dispatch(command);
        if let Err(e) = &result {
            warn!(method, kind = e.kind(), "command rejected: {e}");
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<CommandReply, BridgeError> {
        match command {
            Command::MouseMoveAbsolute { x, y, monitor_index } => {
                let motion = self
                    .mapper
                    .map_absolute(x, y, monitor_index, &self.layout, &*self.platform)?;
                self.inject_motion(motion)
            }
            Command::MouseMoveRelative { dx, dy, monitor_index } => {
                let motion = self
                    .mapper
                    .map_relative(dx, dy, monitor_index, &self.layout, &*self.platform)?;
                self.inject_motion(motion)
            }
            Command::MousePress { button, is_down } => {
                self.platform.inject_button(button, is_down)?;
                Ok(CommandReply::unit())
            }
            Command::MouseScroll { dx, dy } => {
                self.platform.inject_scroll(dx, dy)?;
                Ok(CommandReply::unit())
            }
            Command::KeyPress { code, is_down } => self.press_key(code, is_down),
            Command::LockCursor => {
                self.capture.lock(&*self.platform)?;
                Ok(CommandReply::unit())
            }
            Command::UnlockCursor => {
                self.capture.unlock(&*self.platform)?;
                Ok(CommandReply::unit())
            }
            Command::HookCursorImage { callback_id, hook_all } => {
                self.hook_cursor(callback_id, hook_all)
            }
            Command::UnhookCursorImage { callback_id } => self.unhook_cursor(callback_id),
            Command::GetMonitorCount => {
                let count = ReplyValue::MonitorCount(self.layout.len());
                Ok(CommandReply::with_value(count))
            }
        }
    }

    fn inject_motion(&self, motion: MappedMotion) -> Result<CommandReply, BridgeError> {
        self.platform.inject_pointer_motion(motion.point, motion.kind)?;
        Ok(CommandReply::unit())
    }

    fn press_key(
        &self,
        code: CanonicalKeyCode,
        is_down: bool,
    ) -> Result<CommandReply, BridgeError> {
        let Some(native) = self.keys.reverse_translate(code) else {
            debug!(%code, platform = self.kind.name(), "dropping unmapped key");
            return Err(BridgeError::UnmappedKey {
                code: u32::from(code.as_u16()),
            });
        };
        let extended =
            self.kind == PlatformKind::Windows && windows_vk::is_extended_key(code.as_u16());
        self.platform.inject_key(KeyInjection {
            native,
            pressed: is_down,
            extended,
        })?;
        Ok(CommandReply::unit())
    }

    fn hook_cursor(
        &mut self,
        callback_id: CallbackId,
        hook_all: bool,
    ) -> Result<CommandReply, BridgeError> {
        if self.cursors.subscriber_ids().next().is_none() {
            self.platform.subscribe_cursor_changes()?;
        }
        self.cursors.subscribe(callback_id, hook_all);

        let mut notifications = Vec::new();
        if !self.cursor_visible {
            notifications.push(self.visibility_notification(callback_id, false));
        }
        if let Some(outcome) = self.cursors.initial_outcome(callback_id) {
            notifications.push(outcome.into());
        }
        Ok(CommandReply::with_notifications(notifications))
    }

    fn unhook_cursor(&mut self, callback_id: CallbackId) -> Result<CommandReply, BridgeError> {
        if !self.cursors.is_subscribed(callback_id) {
            debug!(callback_id, "unhook for unknown callback ignored");
            return Ok(CommandReply::unit());
        }
        let is_last = self.cursors.subscriber_ids().count() == 1;
        if is_last {
            self.platform.unsubscribe_cursor_changes()?;
        }
        self.cursors.unsubscribe(callback_id);
        Ok(CommandReply::unit())
    }

    // ── Platform events ───────────────────────────────────────────────────────

    /// A raw pointer delta; forwarded only while the cursor is locked.
    pub fn on_raw_delta(&mut self, dx: f64, dy: f64) -> Option<Notification> {
        self.capture.forward_delta(dx, dy)
    }

    /// A local button transition in the platform's own button numbering;
    /// forwarded only while the cursor is locked.
    pub fn on_local_button(&mut self, native: u32, is_down: bool) -> Option<Notification> {
        if !self.capture.is_locked() {
            return None;
        }
        let Some(button) = PointerButton::from_native(self.kind, native) else {
            debug!(native, platform = self.kind.name(), "dropping unknown local button");
            return None;
        };
        Some(Notification::CursorButton { button, is_down })
    }

    /// A local key transition; forwarded in canonical codes only while the
    /// cursor is locked.
    pub fn on_local_key(&mut self, native: NativeKeyCode, is_down: bool) -> Option<Notification> {
        if !self.capture.is_locked() {
            return None;
        }
        let Some(code) = self.keys.translate(native) else {
            debug!(native, platform = self.kind.name(), "dropping unmapped local key");
            return None;
        };
        Some(Notification::KeyboardButton { code, is_down })
    }

    /// A local wheel event; forwarded only while the cursor is locked.
    pub fn on_local_scroll(&mut self, dx: f64, dy: f64) -> Option<Notification> {
        self.capture.is_locked().then_some(Notification::CursorScroll { dx, dy })
    }

    /// Classifies a new cursor image and returns one notification per subscriber.
    pub fn on_cursor_changed(&mut self, snapshot: &CursorSnapshot) -> Vec<Notification> {
        match self.cursors.classify(snapshot) {
            CursorClassification::Unchanged => Vec::new(),
            CursorClassification::Changed {
                classification,
                outcomes,
            } => {
                debug!(
                    id = classification.id(),
                    classification = classification.label(),
                    subscribers = outcomes.len(),
                    "cursor changed"
                );
                outcomes.into_iter().map(Notification::from).collect()
            }
        }
    }

    /// The local cursor was shown or hidden.
    pub fn on_cursor_visibility(&mut self, visible: bool) -> Vec<Notification> {
        if self.cursor_visible == visible {
            return Vec::new();
        }
        self.cursor_visible = visible;
        let ids: Vec<CallbackId> = self.cursors.subscriber_ids().collect();
        ids.into_iter()
            .map(|id| self.visibility_notification(id, visible))
            .collect()
    }

    /// Replaces the monitor layout after a display configuration change.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidLayout`] for an empty layout or a
    /// degenerate monitor; the previous layout stays in effect.
    pub fn on_monitors_changed(&mut self, layout: MonitorLayout) -> Result<(), BridgeError> {
        let layout = MonitorLayout::try_new(layout.iter().cloned())?;
        info!(monitors = layout.len(), "monitor layout replaced");
        self.layout = layout;
        self.mapper.reset_accumulator();
        Ok(())
    }

    fn visibility_notification(&self, callback_id: CallbackId, visible: bool) -> Notification {
        let position = match self.platform.cursor_position() {
            Ok(point) => self.layout.locate(point),
            Err(e) => {
                debug!("cursor position unavailable for visibility report: {e}");
                None
            }
        };
        Notification::CursorVisibility {
            callback_id,
            visible,
            position,
        }
    }
}

/// A [`BridgeSession`] behind one mutex, shareable across threads.
///
/// The lock is held for exactly one command or event.  Cursor images are
/// hashed before the lock is taken.
#[derive(Clone)]
pub struct SharedBridge {
    inner: Arc<Mutex<BridgeSession>>,
}

impl SharedBridge {
    pub fn new(session: BridgeSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes one command under the lock.
    ///
    /// # Errors
    ///
    /// See [`BridgeSession::execute`].
    pub fn execute(&self, command: Command) -> Result<CommandReply, BridgeError> {
        self.lock().execute(command)
    }

    pub fn on_raw_delta(&self, dx: f64, dy: f64) -> Option<Notification> {
        self.lock().on_raw_delta(dx, dy)
    }

    pub fn on_local_button(&self, native: u32, is_down: bool) -> Option<Notification> {
        self.lock().on_local_button(native, is_down)
    }

    pub fn on_local_key(&self, native: NativeKeyCode, is_down: bool) -> Option<Notification> {
        self.lock().on_local_key(native, is_down)
    }

    pub fn on_local_scroll(&self, dx: f64, dy: f64) -> Option<Notification> {
        self.lock().on_local_scroll(dx, dy)
    }

    /// Hashes `image` without the lock, then classifies it under the lock.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MalformedSnapshot`] for an unreadable image; the
    /// cache is not touched in that case.
    pub fn on_cursor_image(
        &self,
        image: &RawCursorImage,
    ) -> Result<Vec<Notification>, BridgeError> {
        let snapshot = CursorSnapshot::capture(image).map_err(|e| {
            debug!("dropping cursor image: {e}");
            e
        })?;
        Ok(self.lock().on_cursor_changed(&snapshot))
    }

    pub fn on_cursor_visibility(&self, visible: bool) -> Vec<Notification> {
        self.lock().on_cursor_visibility(visible)
    }

    /// # Errors
    ///
    /// See [`BridgeSession::on_monitors_changed`].
    pub fn on_monitors_changed(&self, layout: MonitorLayout) -> Result<(), BridgeError> {
        self.lock().on_monitors_changed(layout)
    }

    pub fn monitor_count(&self) -> usize {
        self.lock().layout().len()
    }

    pub fn is_locked(&self) -> bool {
        self.lock().is_locked()
    }

    // Poison is recovered: state is only written after every fallible step succeeds.
    fn lock(&self) -> MutexGuard<'_, BridgeSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::well_known::WellKnownCursor;
    use crate::cursor::cache::Classification;
    use crate::domain::button::MotionKind;
    use crate::domain::monitor::{MonitorDescriptor, PhysicalPoint};
    use crate::platform::mock::RecordingPlatform;

    fn session_on(platform: Arc<RecordingPlatform>, kind: PlatformKind) -> BridgeSession {
        BridgeSession::new(platform, SessionOptions::for_platform(kind)).unwrap()
    }

    fn two_monitors() -> MonitorLayout {
        MonitorLayout::new([
            MonitorDescriptor {
                index: 0,
                origin_x: 0,
                origin_y: 0,
                width: 1920,
                height: 1080,
                scale_factor: 1.0,
            },
            MonitorDescriptor {
                index: 1,
                origin_x: 1920,
                origin_y: 0,
                width: 1280,
                height: 1024,
                scale_factor: 2.0,
            },
        ])
    }

    #[test]
    fn test_absolute_move_injects_mapped_point() {
        // Arrange
        let platform = Arc::new(RecordingPlatform::with_layout(two_monitors()));
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Windows);

        // Act
        session
            .execute(Command::MouseMoveAbsolute {
                x: 0.5,
                y: 0.5,
                monitor_index: 1,
            })
            .unwrap();

        // Assert
        let motions = platform.motions.lock().unwrap();
        assert_eq!(*motions, vec![(PhysicalPoint::new(2560.0, 512.0), MotionKind::Moved)]);
    }

    #[test]
    fn test_invalid_monitor_index_injects_nothing() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::X11);

        let result = session.execute(Command::MouseMoveAbsolute {
            x: 0.5,
            y: 0.5,
            monitor_index: 3,
        });

        assert_eq!(result, Err(BridgeError::InvalidMonitorIndex { index: 3, count: 1 }));
        assert_eq!(platform.injected_count(), 0);
    }

    #[test]
    fn test_key_press_reverse_translates_to_native_code() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Macos);

        session
            .execute(Command::KeyPress {
                code: CanonicalKeyCode(0x41),
                is_down: true,
            })
            .unwrap();

        let keys = platform.keys.lock().unwrap();
        assert_eq!(
            *keys,
            vec![KeyInjection {
                native: 0x00,
                pressed: true,
                extended: false
            }]
        );
    }

    #[test]
    fn test_windows_arrow_key_is_injected_as_extended() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Windows);

        session
            .execute(Command::KeyPress {
                code: CanonicalKeyCode(windows_vk::vk::LEFT),
                is_down: false,
            })
            .unwrap();

        assert!(platform.keys.lock().unwrap()[0].extended);
    }

    #[test]
    fn test_unmapped_key_is_reported_and_not_injected() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Macos);

        let result = session.execute(Command::KeyPress {
            code: CanonicalKeyCode(0xFF),
            is_down: true,
        });

        assert_eq!(result, Err(BridgeError::UnmappedKey { code: 0xFF }));
        assert!(platform.keys.lock().unwrap().is_empty());
    }

    #[test]
    fn test_drag_is_preserved_for_held_button() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::X11);
        session
            .execute(Command::MousePress {
                button: PointerButton::Left,
                is_down: true,
            })
            .unwrap();

        session
            .execute(Command::MouseMoveRelative {
                dx: 5.0,
                dy: 5.0,
                monitor_index: 0,
            })
            .unwrap();

        assert_eq!(platform.motions.lock().unwrap()[0].1, MotionKind::LeftDragged);
    }

    #[test]
    fn test_lock_forwards_deltas_and_unlock_stops_them() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Macos);

        session.execute(Command::LockCursor).unwrap();
        let while_locked = session.on_raw_delta(2.0, -1.0);
        session.execute(Command::UnlockCursor).unwrap();
        let after = session.on_raw_delta(2.0, -1.0);

        assert_eq!(while_locked, Some(Notification::CursorMoved { dx: 2.0, dy: -1.0 }));
        assert_eq!(after, None);
    }

    #[test]
    fn test_local_buttons_are_reported_only_while_locked() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::Windows);
        let vk_rbutton = PointerButton::Right.native_code(PlatformKind::Windows);
        assert_eq!(session.on_local_button(vk_rbutton, true), None);

        session.execute(Command::LockCursor).unwrap();

        assert_eq!(
            session.on_local_button(vk_rbutton, true),
            Some(Notification::CursorButton {
                button: PointerButton::Right,
                is_down: true
            })
        );
        assert!(session.on_local_scroll(0.0, -3.0).is_some());
    }

    #[test]
    fn test_local_button_is_decoded_from_native_numbering() {
        // Arrange: CGMouseButton 1 is the right button, canonical id 3
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::Macos);
        session.execute(Command::LockCursor).unwrap();

        // Act
        let right = session.on_local_button(1, false);
        let unknown = session.on_local_button(42, true);

        // Assert
        assert_eq!(
            right,
            Some(Notification::CursorButton {
                button: PointerButton::Right,
                is_down: false
            })
        );
        assert_eq!(unknown, None);
    }

    #[test]
    fn test_local_keys_are_translated_and_reported_only_while_locked() {
        // Arrange: macOS kVK_ANSI_A is 0x00, canonical VK_A is 0x41
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::Macos);
        let unlocked = session.on_local_key(0x00, true);

        // Act
        session.execute(Command::LockCursor).unwrap();
        let locked = session.on_local_key(0x00, true);

        // Assert
        assert_eq!(unlocked, None);
        assert_eq!(
            locked,
            Some(Notification::KeyboardButton {
                code: CanonicalKeyCode(0x41),
                is_down: true
            })
        );
    }

    #[test]
    fn test_unmapped_local_key_is_dropped() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::Macos);
        session.execute(Command::LockCursor).unwrap();

        assert_eq!(session.on_local_key(0xFFFF, true), None);
    }

    #[test]
    fn test_first_hook_subscribes_and_last_unhook_unsubscribes() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(Arc::clone(&platform), PlatformKind::Windows);
        let subscribed = || {
            platform
                .cursor_changes_subscribed
                .load(std::sync::atomic::Ordering::Relaxed)
        };

        session
            .execute(Command::HookCursorImage {
                callback_id: 1,
                hook_all: false,
            })
            .unwrap();
        session
            .execute(Command::HookCursorImage {
                callback_id: 2,
                hook_all: false,
            })
            .unwrap();
        assert!(subscribed());

        session.execute(Command::UnhookCursorImage { callback_id: 1 }).unwrap();
        assert!(subscribed());
        session.execute(Command::UnhookCursorImage { callback_id: 2 }).unwrap();
        assert!(!subscribed());
    }

    #[test]
    fn test_well_known_cursor_from_system_set_is_reported_by_id() {
        let arrow = CursorSnapshot::from_rgba(1, 1, 0, 0, vec![0, 0, 0, 255]).unwrap();
        let cursors = vec![(WellKnownCursor::Arrow, arrow.clone())];
        let platform = Arc::new(RecordingPlatform::new().with_system_cursors(cursors));
        let mut session = session_on(platform, PlatformKind::Windows);
        session
            .execute(Command::HookCursorImage {
                callback_id: 5,
                hook_all: false,
            })
            .unwrap();

        let notes = session.on_cursor_changed(&arrow);

        assert_eq!(
            notes,
            vec![Notification::CursorImage {
                callback_id: 5,
                classification: Classification::WellKnown { id: 32512 }
            }]
        );
    }

    #[test]
    fn test_hook_while_cursor_hidden_reports_visibility_first() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::Windows);
        session.on_cursor_visibility(false);

        let reply = session
            .execute(Command::HookCursorImage {
                callback_id: 3,
                hook_all: false,
            })
            .unwrap();

        assert!(matches!(
            reply.notifications.as_slice(),
            [Notification::CursorVisibility { visible: false, .. }]
        ));
    }

    #[test]
    fn test_monitor_change_replaces_layout() {
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::X11);

        session.on_monitors_changed(two_monitors()).unwrap();
        let reply = session.execute(Command::GetMonitorCount).unwrap();

        assert_eq!(reply.value, ReplyValue::MonitorCount(2));
    }

    #[test]
    fn test_degenerate_monitor_change_keeps_previous_layout() {
        // Arrange
        let platform = Arc::new(RecordingPlatform::new());
        let mut session = session_on(platform, PlatformKind::X11);
        let degenerate = MonitorLayout::new([MonitorDescriptor {
            index: 0,
            origin_x: 0,
            origin_y: 0,
            width: 3_000_000_000,
            height: 1080,
            scale_factor: 1.0,
        }]);

        // Act
        let result = session.on_monitors_changed(degenerate);

        // Assert
        assert!(matches!(result, Err(BridgeError::InvalidLayout(_))));
        assert_eq!(session.layout(), &MonitorLayout::single(1920, 1080));
    }

    #[test]
    fn test_shared_bridge_rejects_malformed_image_without_touching_cache() {
        let platform = Arc::new(RecordingPlatform::new());
        let bridge = SharedBridge::new(session_on(platform, PlatformKind::Macos));
        let image = RawCursorImage {
            representations: vec![],
            hotspot_x: 0,
            hotspot_y: 0,
            scale_factor: 1.0,
        };

        let result = bridge.on_cursor_image(&image);

        assert!(matches!(result, Err(BridgeError::MalformedSnapshot(_))));
        assert_eq!(bridge.lock().cursor_cache().last_seen_hash(), None);
    }
}
