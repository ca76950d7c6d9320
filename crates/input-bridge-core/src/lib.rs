//! # input-bridge-core
//!
//! Core of a remote-input bridge: a remote controller sends high-level input
//! commands (pointer moves, button presses, key presses, cursor capture), and
//! the bridge injects them into the local desktop while reporting local
//! cursor state back.
//!
//! The crate has no OS, UI, or transport dependencies.  The host process
//! supplies an [`InputPlatform`] implementation and a channel that carries
//! JSON commands in and JSON responses and notifications out.
//!
//! # Architecture overview
//!
//! - **`keymap`** – Bidirectional tables between each platform's native key
//!   codes (macOS `CGKeyCode`, X11 KeySym, Windows VK) and the canonical key
//!   space used on the channel, which is Windows VK numbering.
//!
//! - **`domain`** – Pure pointer logic: monitor layouts, canonical mouse
//!   buttons, and the `CoordinateMapper` that turns monitor-relative fractions
//!   and pixel deltas into physical injection points, flipping the vertical
//!   axis on bottom-left platforms and keeping drags alive.
//!
//! - **`cursor`** – Cursor image capture (hashing and RGBA normalisation) and
//!   the content-addressed identity cache that decides whether a cursor change
//!   is sent as a well-known id, a cached id, or a full bitmap.
//!
//! - **`capture`** – The lock/unlock state machine for pointer capture.
//!
//! - **`protocol`** – JSON command decoding, notification and response
//!   encoding, and the binary cursor payload record.
//!
//! - **`session`** – `BridgeSession` ties everything together; `SharedBridge`
//!   puts it behind a mutex for multi-threaded hosts.
//!
//! - **`platform`** – The `InputPlatform` seam and the recording mock.

pub mod capture;
pub mod cursor;
pub mod domain;
pub mod error;
pub mod keymap;
pub mod platform;
pub mod protocol;
pub mod session;

pub use capture::{CaptureController, CaptureState};
pub use cursor::cache::{
    CallbackId, Classification, CursorClassification, CursorIdentityCache, SubscriberOutcome,
};
pub use cursor::well_known::WellKnownCursor;
pub use cursor::{ContentHash, CursorSnapshot, PixelFormat, RawCursorImage};
pub use domain::button::{MotionKind, PointerButton};
pub use domain::mapper::{CoordinateMapper, MappedMotion, PointerQuery, VerticalOrigin};
pub use domain::monitor::{MonitorDescriptor, MonitorLayout, MonitorPosition, PhysicalPoint};
pub use error::BridgeError;
pub use keymap::{CanonicalKeyCode, KeyCodeTable, NativeKeyCode};
pub use platform::{DeltaSubscription, InputPlatform, KeyInjection, PlatformError, PlatformKind};
pub use protocol::{
    decode_command, encode_response, Command, CommandReply, Notification, ReplyValue,
};
pub use session::{BridgeSession, SessionOptions, SharedBridge};
