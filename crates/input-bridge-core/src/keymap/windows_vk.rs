//! Windows Virtual-Key table and named VK constants.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! # Why the Windows table is an identity map
//!
//! The canonical vocabulary *is* VK numbering, so on Windows translation is a
//! membership check: a VK listed in `KNOWN_VKS` maps to itself and anything
//! else (mouse-button VKs, reserved ranges) is unmapped.
//!
//! # Extended keys
//!
//! `SendInput` distinguishes the right-hand Control/Alt keys, the navigation
//! cluster, the arrows and keypad Divide from their left/numpad twins through
//! the `KEYEVENTF_EXTENDEDKEY` flag rather than the VK value.  The
//! [`is_extended_key`] predicate tells the key sink when to set it.

use super::KeyTableDef;
use crate::platform::PlatformKind;

/// Named VK values used outside the tables.
pub mod vk {
    pub const BACK: u16 = 0x08;
    pub const TAB: u16 = 0x09;
    pub const RETURN: u16 = 0x0D;
    pub const SHIFT: u16 = 0x10;
    pub const CONTROL: u16 = 0x11;
    pub const MENU: u16 = 0x12;
    pub const PAUSE: u16 = 0x13;
    pub const ESCAPE: u16 = 0x1B;
    pub const SPACE: u16 = 0x20;
    pub const PRIOR: u16 = 0x21;
    pub const NEXT: u16 = 0x22;
    pub const END: u16 = 0x23;
    pub const HOME: u16 = 0x24;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
    pub const SNAPSHOT: u16 = 0x2C;
    pub const INSERT: u16 = 0x2D;
    pub const DELETE: u16 = 0x2E;
    pub const KEY_A: u16 = 0x41;
    pub const KEY_Z: u16 = 0x5A;
    pub const LWIN: u16 = 0x5B;
    pub const RWIN: u16 = 0x5C;
    pub const APPS: u16 = 0x5D;
    pub const DIVIDE: u16 = 0x6F;
    pub const F1: u16 = 0x70;
    pub const NUMLOCK: u16 = 0x90;
    pub const LSHIFT: u16 = 0xA0;
    pub const RSHIFT: u16 = 0xA1;
    pub const LCONTROL: u16 = 0xA2;
    pub const RCONTROL: u16 = 0xA3;
    pub const LMENU: u16 = 0xA4;
    pub const RMENU: u16 = 0xA5;
}

/// Every VK the bridge accepts as a key.
const KNOWN_VKS: &[u16] = &[
    // Editing and whitespace
    0x08, 0x09, 0x0C, 0x0D, 0x13, 0x14, 0x1B, 0x20,
    // Modifiers, generic and sided
    0x10, 0x11, 0x12, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0x5B, 0x5C, 0x5D,
    // IME
    0x15, 0x18, 0x19, 0xE5,
    // Navigation
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x2C, 0x2D, 0x2E, 0x2F,
    // Digits
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
    // Letters
    0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x4D,
    0x4E, 0x4F, 0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A,
    // Sleep
    0x5F,
    // Keypad
    0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x6B, 0x6C,
    0x6D, 0x6E, 0x6F,
    // F1-F24
    0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x7B, 0x7C,
    0x7D, 0x7E, 0x7F, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    // Locks
    0x90, 0x91,
    // Browser and media
    0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB0, 0xB1, 0xB2,
    0xB3,
    // OEM punctuation
    0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF, 0xC0, 0xDB, 0xDC, 0xDD, 0xDE, 0xDF, 0xE2,
];

const WINDOWS_ENTRY_COUNT: usize = KNOWN_VKS.len();

const WINDOWS_ENTRIES: [(u32, u16); WINDOWS_ENTRY_COUNT] = {
    let mut t = [(0u32, 0u16); WINDOWS_ENTRY_COUNT];
    let mut i = 0;
    while i < WINDOWS_ENTRY_COUNT {
        t[i] = (KNOWN_VKS[i] as u32, KNOWN_VKS[i]);
        i += 1;
    }
    t
};

pub static WINDOWS_TABLE: KeyTableDef = KeyTableDef {
    platform: PlatformKind::Windows,
    entries: &WINDOWS_ENTRIES,
    native_aliases: &[],
    collapses: &[],
};

/// Returns `true` if `vk` must be injected with `KEYEVENTF_EXTENDEDKEY`.
pub fn is_extended_key(vk: u16) -> bool {
    matches!(
        vk,
        vk::RMENU
            | vk::RCONTROL
            | vk::INSERT
            | vk::DELETE
            | vk::HOME
            | vk::END
            | vk::PRIOR
            | vk::NEXT
            | vk::UP
            | vk::DOWN
            | vk::LEFT
            | vk::RIGHT
            | vk::DIVIDE
            | vk::LWIN
            | vk::RWIN
            | vk::APPS
            | vk::NUMLOCK
            | vk::SNAPSHOT
    )
}

#[cfg(test)]
mod tests {
    use super::super::{CanonicalKeyCode, KeyCodeTable};
    use super::*;

    #[test]
    fn test_known_vks_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for &code in KNOWN_VKS {
            assert!(seen.insert(code), "VK 0x{code:02X} listed twice");
        }
    }

    #[test]
    fn test_windows_table_is_identity_over_known_vks() {
        let table = KeyCodeTable::windows();
        for &code in KNOWN_VKS {
            assert_eq!(table.translate(u32::from(code)), Some(CanonicalKeyCode(code)));
            assert_eq!(table.reverse_translate(CanonicalKeyCode(code)), Some(u32::from(code)));
        }
    }

    #[test]
    fn test_mouse_button_vks_are_unmapped() {
        // VK_LBUTTON, VK_RBUTTON, VK_CANCEL, VK_MBUTTON, VK_XBUTTON1, VK_XBUTTON2
        let table = KeyCodeTable::windows();
        for code in [0x01u32, 0x02, 0x03, 0x04, 0x05, 0x06] {
            assert_eq!(table.translate(code), None, "VK 0x{code:02X} should be unmapped");
        }
    }

    #[test]
    fn test_navigation_cluster_is_extended() {
        for code in [vk::INSERT, vk::DELETE, vk::HOME, vk::END, vk::PRIOR, vk::NEXT] {
            assert!(is_extended_key(code), "VK 0x{code:02X} should be extended");
        }
    }

    #[test]
    fn test_right_modifiers_are_extended_but_left_are_not() {
        assert!(is_extended_key(vk::RCONTROL));
        assert!(is_extended_key(vk::RMENU));
        assert!(!is_extended_key(vk::LCONTROL));
        assert!(!is_extended_key(vk::LMENU));
        assert!(!is_extended_key(vk::LSHIFT));
        assert!(!is_extended_key(vk::RSHIFT));
    }

    #[test]
    fn test_letters_and_return_are_not_extended() {
        assert!(!is_extended_key(vk::KEY_A));
        assert!(!is_extended_key(vk::RETURN));
    }
}
