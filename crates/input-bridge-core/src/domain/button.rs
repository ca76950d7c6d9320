//! Canonical pointer buttons and their native encodings.
//!
//! Canonical ids follow the channel vocabulary (`1=left, 2=middle, 3=right`,
//! plus the two side buttons), which is *not* the numbering any single
//! platform uses.  macOS, for instance, numbers the right button 1 and the
//! middle button 2.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::platform::PlatformKind;

/// A mouse button in the canonical vocabulary.
///
/// Serialized as its canonical id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PointerButton {
    Left = 1,
    Middle = 2,
    Right = 3,
    /// First side button (XBUTTON1, "back").
    Back = 4,
    /// Second side button (XBUTTON2, "forward").
    Forward = 5,
}

impl TryFrom<u8> for PointerButton {
    type Error = BridgeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Left),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Right),
            4 => Ok(Self::Back),
            5 => Ok(Self::Forward),
            _ => Err(BridgeError::Decode(format!("button id must be 1..=5, got {v}"))),
        }
    }
}

impl From<PointerButton> for u8 {
    fn from(button: PointerButton) -> Self {
        button.id()
    }
}

impl PointerButton {
    pub const ALL: [PointerButton; 5] =
        [Self::Left, Self::Middle, Self::Right, Self::Back, Self::Forward];

    /// Canonical id as sent on the channel.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The button number `platform` reports in raw button events.
    ///
    /// macOS uses `CGMouseButton` numbers, X11 core protocol button numbers,
    /// and Windows the mouse-button virtual-key codes (`VK_LBUTTON` ...).
    pub fn native_code(self, platform: PlatformKind) -> u32 {
        match platform {
            PlatformKind::Macos => match self {
                Self::Left => 0,
                Self::Right => 1,
                Self::Middle => 2,
                Self::Back => 3,
                Self::Forward => 4,
            },
            PlatformKind::X11 => match self {
                Self::Left => 1,
                Self::Middle => 2,
                Self::Right => 3,
                Self::Back => 8,
                Self::Forward => 9,
            },
            PlatformKind::Windows => match self {
                Self::Left => 0x01,    // VK_LBUTTON
                Self::Right => 0x02,   // VK_RBUTTON
                Self::Middle => 0x04,  // VK_MBUTTON
                Self::Back => 0x05,    // VK_XBUTTON1
                Self::Forward => 0x06, // VK_XBUTTON2
            },
        }
    }

    /// Inverse of [`native_code`](Self::native_code).
    pub fn from_native(platform: PlatformKind, native: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.native_code(platform) == native)
    }
}

/// How a pointer move must be injected so that drags survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionKind {
    Moved,
    LeftDragged,
    RightDragged,
    OtherDragged,
}

impl MotionKind {
    /// Motion kind for a move performed while `pressed` is held.
    pub fn for_pressed(pressed: Option<PointerButton>) -> Self {
        match pressed {
            None => Self::Moved,
            Some(PointerButton::Left) => Self::LeftDragged,
            Some(PointerButton::Right) => Self::RightDragged,
            Some(_) => Self::OtherDragged,
        }
    }
}
