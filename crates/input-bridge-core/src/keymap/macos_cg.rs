//! macOS `CGKeyCode` table.
//!
//! CGKeyCode values are defined in HIToolbox `Events.h` (`kVK_*`).  They are
//! ANSI key *positions*, so the letter keys are not in alphabetical order.
//!
//! macOS reports one generic code for the left Shift, Control, Option and
//! Command keys.  Those native codes translate to the generic `VK_SHIFT`,
//! `VK_CONTROL` and `VK_MENU` codes, and the sided `VK_L*` variants collapse
//! onto the same native key when injecting.

use super::KeyTableDef;
use crate::platform::PlatformKind;

/// `kVK_ANSI_KeypadEnter`.
pub const KVK_KEYPAD_ENTER: u32 = 0x4C;
/// `kVK_Shift` (left).
pub const KVK_SHIFT: u32 = 0x38;
/// `kVK_Control` (left).
pub const KVK_CONTROL: u32 = 0x3B;
/// `kVK_Option` (left).
pub const KVK_OPTION: u32 = 0x3A;

pub static MACOS_TABLE: KeyTableDef = KeyTableDef {
    platform: PlatformKind::Macos,
    entries: MACOS_ENTRIES,
    native_aliases: &[KVK_KEYPAD_ENTER],
    collapses: &[
        (0xA0, KVK_SHIFT),   // VK_LSHIFT   -> kVK_Shift
        (0xA2, KVK_CONTROL), // VK_LCONTROL -> kVK_Control
        (0xA4, KVK_OPTION),  // VK_LMENU    -> kVK_Option
    ],
};

const MACOS_ENTRIES: &[(u32, u16)] = &[
    // Letters
    (0x00, 0x41), // kVK_ANSI_A
    (0x0B, 0x42), // kVK_ANSI_B
    (0x08, 0x43), // kVK_ANSI_C
    (0x02, 0x44), // kVK_ANSI_D
    (0x0E, 0x45), // kVK_ANSI_E
    (0x03, 0x46), // kVK_ANSI_F
    (0x05, 0x47), // kVK_ANSI_G
    (0x04, 0x48), // kVK_ANSI_H
    (0x22, 0x49), // kVK_ANSI_I
    (0x26, 0x4A), // kVK_ANSI_J
    (0x28, 0x4B), // kVK_ANSI_K
    (0x25, 0x4C), // kVK_ANSI_L
    (0x2E, 0x4D), // kVK_ANSI_M
    (0x2D, 0x4E), // kVK_ANSI_N
    (0x1F, 0x4F), // kVK_ANSI_O
    (0x23, 0x50), // kVK_ANSI_P
    (0x0C, 0x51), // kVK_ANSI_Q
    (0x0F, 0x52), // kVK_ANSI_R
    (0x01, 0x53), // kVK_ANSI_S
    (0x11, 0x54), // kVK_ANSI_T
    (0x20, 0x55), // kVK_ANSI_U
    (0x09, 0x56), // kVK_ANSI_V
    (0x0D, 0x57), // kVK_ANSI_W
    (0x07, 0x58), // kVK_ANSI_X
    (0x10, 0x59), // kVK_ANSI_Y
    (0x06, 0x5A), // kVK_ANSI_Z
    // Digit row
    (0x1D, 0x30), // kVK_ANSI_0
    (0x12, 0x31), // kVK_ANSI_1
    (0x13, 0x32), // kVK_ANSI_2
    (0x14, 0x33), // kVK_ANSI_3
    (0x15, 0x34), // kVK_ANSI_4
    (0x17, 0x35), // kVK_ANSI_5
    (0x16, 0x36), // kVK_ANSI_6
    (0x1A, 0x37), // kVK_ANSI_7
    (0x1C, 0x38), // kVK_ANSI_8
    (0x19, 0x39), // kVK_ANSI_9
    // Punctuation
    (0x18, 0xBB), // kVK_ANSI_Equal        -> VK_OEM_PLUS
    (0x1B, 0xBD), // kVK_ANSI_Minus        -> VK_OEM_MINUS
    (0x1E, 0xDD), // kVK_ANSI_RightBracket -> VK_OEM_6
    (0x21, 0xDB), // kVK_ANSI_LeftBracket  -> VK_OEM_4
    (0x27, 0xDE), // kVK_ANSI_Quote        -> VK_OEM_7
    (0x29, 0xBA), // kVK_ANSI_Semicolon    -> VK_OEM_1
    (0x2A, 0xDC), // kVK_ANSI_Backslash    -> VK_OEM_5
    (0x2B, 0xBC), // kVK_ANSI_Comma        -> VK_OEM_COMMA
    (0x2C, 0xBF), // kVK_ANSI_Slash        -> VK_OEM_2
    (0x2F, 0xBE), // kVK_ANSI_Period       -> VK_OEM_PERIOD
    (0x32, 0xC0), // kVK_ANSI_Grave        -> VK_OEM_3
    (0x0A, 0xE2), // kVK_ISO_Section       -> VK_OEM_102
    // Editing and whitespace
    (0x24, 0x0D), // kVK_Return
    (0x30, 0x09), // kVK_Tab
    (0x31, 0x20), // kVK_Space
    (0x33, 0x08), // kVK_Delete (backspace)
    (0x35, 0x1B), // kVK_Escape
    (0x75, 0x2E), // kVK_ForwardDelete
    (0x72, 0x2D), // kVK_Help (Insert position on PC keyboards)
    // Modifiers
    (0x37, 0x5B), // kVK_Command         -> VK_LWIN
    (0x36, 0x5C), // kVK_RightCommand    -> VK_RWIN
    (0x38, 0x10), // kVK_Shift           -> VK_SHIFT
    (0x3C, 0xA1), // kVK_RightShift      -> VK_RSHIFT
    (0x3B, 0x11), // kVK_Control         -> VK_CONTROL
    (0x3E, 0xA3), // kVK_RightControl    -> VK_RCONTROL
    (0x3A, 0x12), // kVK_Option          -> VK_MENU
    (0x3D, 0xA5), // kVK_RightOption     -> VK_RMENU
    (0x39, 0x14), // kVK_CapsLock
    (0x3F, 0x18), // kVK_Function        -> VK_FINAL
    // Navigation
    (0x73, 0x24), // kVK_Home
    (0x77, 0x23), // kVK_End
    (0x74, 0x21), // kVK_PageUp   -> VK_PRIOR
    (0x79, 0x22), // kVK_PageDown -> VK_NEXT
    (0x7B, 0x25), // kVK_LeftArrow
    (0x7E, 0x26), // kVK_UpArrow
    (0x7C, 0x27), // kVK_RightArrow
    (0x7D, 0x28), // kVK_DownArrow
    // Function keys
    (0x7A, 0x70), // kVK_F1
    (0x78, 0x71), // kVK_F2
    (0x63, 0x72), // kVK_F3
    (0x76, 0x73), // kVK_F4
    (0x60, 0x74), // kVK_F5
    (0x61, 0x75), // kVK_F6
    (0x62, 0x76), // kVK_F7
    (0x64, 0x77), // kVK_F8
    (0x65, 0x78), // kVK_F9
    (0x6D, 0x79), // kVK_F10
    (0x67, 0x7A), // kVK_F11
    (0x6F, 0x7B), // kVK_F12
    (0x69, 0x7C), // kVK_F13
    (0x6B, 0x7D), // kVK_F14
    (0x71, 0x7E), // kVK_F15
    (0x6A, 0x7F), // kVK_F16
    (0x40, 0x80), // kVK_F17
    (0x4F, 0x81), // kVK_F18
    (0x50, 0x82), // kVK_F19
    (0x5A, 0x83), // kVK_F20
    // Keypad
    (0x52, 0x60), // kVK_ANSI_Keypad0
    (0x53, 0x61), // kVK_ANSI_Keypad1
    (0x54, 0x62), // kVK_ANSI_Keypad2
    (0x55, 0x63), // kVK_ANSI_Keypad3
    (0x56, 0x64), // kVK_ANSI_Keypad4
    (0x57, 0x65), // kVK_ANSI_Keypad5
    (0x58, 0x66), // kVK_ANSI_Keypad6
    (0x59, 0x67), // kVK_ANSI_Keypad7
    (0x5B, 0x68), // kVK_ANSI_Keypad8
    (0x5C, 0x69), // kVK_ANSI_Keypad9
    (0x43, 0x6A), // kVK_ANSI_KeypadMultiply
    (0x45, 0x6B), // kVK_ANSI_KeypadPlus
    (0x5F, 0x6C), // kVK_JIS_KeypadComma -> VK_SEPARATOR
    (0x4E, 0x6D), // kVK_ANSI_KeypadMinus
    (0x41, 0x6E), // kVK_ANSI_KeypadDecimal
    (0x4B, 0x6F), // kVK_ANSI_KeypadDivide
    (0x47, 0x90), // kVK_ANSI_KeypadClear -> VK_NUMLOCK
    (KVK_KEYPAD_ENTER, 0x0D), // shares VK_RETURN with kVK_Return
    // Media and system
    (0x4A, 0xAD), // kVK_Mute       -> VK_VOLUME_MUTE
    (0x49, 0xAE), // kVK_VolumeDown -> VK_VOLUME_DOWN
    (0x48, 0xAF), // kVK_VolumeUp   -> VK_VOLUME_UP
    (0x6E, 0x5D), // kVK_ContextualMenu -> VK_APPS
    (0x7F, 0x5F), // power key      -> VK_SLEEP
    // JIS layout
    (0x66, 0xE5), // kVK_JIS_Eisu
    (0x68, 0x15), // kVK_JIS_Kana -> VK_KANA
];
