//! X11 KeySym table for Linux sessions.
//!
//! KeySym values are defined in `X11/keysymdef.h`.
//! Reference: `include/X11/keysymdef.h` in the xorgproto repository.
//!
//! Letter keys use the *lowercase* KeySym (`XK_a` = 0x61).  XTest applies the
//! Shift state itself, so the base form is always the one injected.
//!
//! X11 has sided KeySyms for every modifier, so the sided `VK_L*`/`VK_R*`
//! codes map one-to-one and the generic `VK_SHIFT`, `VK_CONTROL` and
//! `VK_MENU` codes collapse onto the left-hand KeySym.

use super::KeyTableDef;
use crate::platform::PlatformKind;

/// `XK_KP_Enter`.
pub const XK_KP_ENTER: u32 = 0xFF8D;
/// `XK_ISO_Level3_Shift` (AltGr on most European layouts).
pub const XK_ISO_LEVEL3_SHIFT: u32 = 0xFE03;

pub static X11_TABLE: KeyTableDef = KeyTableDef {
    platform: PlatformKind::X11,
    entries: X11_ENTRIES,
    native_aliases: &[XK_KP_ENTER, XK_ISO_LEVEL3_SHIFT],
    collapses: &[
        (0x10, 0xFFE1), // VK_SHIFT   -> XK_Shift_L
        (0x11, 0xFFE3), // VK_CONTROL -> XK_Control_L
        (0x12, 0xFFE9), // VK_MENU    -> XK_Alt_L
    ],
};

const X11_ENTRIES: &[(u32, u16)] = &[
    // Letters (lowercase keysyms 0x61-0x7A)
    (0x0061, 0x41), // XK_a
    (0x0062, 0x42), // XK_b
    (0x0063, 0x43), // XK_c
    (0x0064, 0x44), // XK_d
    (0x0065, 0x45), // XK_e
    (0x0066, 0x46), // XK_f
    (0x0067, 0x47), // XK_g
    (0x0068, 0x48), // XK_h
    (0x0069, 0x49), // XK_i
    (0x006A, 0x4A), // XK_j
    (0x006B, 0x4B), // XK_k
    (0x006C, 0x4C), // XK_l
    (0x006D, 0x4D), // XK_m
    (0x006E, 0x4E), // XK_n
    (0x006F, 0x4F), // XK_o
    (0x0070, 0x50), // XK_p
    (0x0071, 0x51), // XK_q
    (0x0072, 0x52), // XK_r
    (0x0073, 0x53), // XK_s
    (0x0074, 0x54), // XK_t
    (0x0075, 0x55), // XK_u
    (0x0076, 0x56), // XK_v
    (0x0077, 0x57), // XK_w
    (0x0078, 0x58), // XK_x
    (0x0079, 0x59), // XK_y
    (0x007A, 0x5A), // XK_z
    // Digits
    (0x0030, 0x30), // XK_0
    (0x0031, 0x31), // XK_1
    (0x0032, 0x32), // XK_2
    (0x0033, 0x33), // XK_3
    (0x0034, 0x34), // XK_4
    (0x0035, 0x35), // XK_5
    (0x0036, 0x36), // XK_6
    (0x0037, 0x37), // XK_7
    (0x0038, 0x38), // XK_8
    (0x0039, 0x39), // XK_9
    // Control keys
    (0xFF0D, 0x0D), // XK_Return
    (0xFF1B, 0x1B), // XK_Escape
    (0xFF08, 0x08), // XK_BackSpace
    (0xFF09, 0x09), // XK_Tab
    (0x0020, 0x20), // XK_space
    (0xFFE5, 0x14), // XK_Caps_Lock
    (0xFF14, 0x91), // XK_Scroll_Lock
    (0xFF13, 0x13), // XK_Pause
    (0xFF63, 0x2D), // XK_Insert
    (0xFFFF, 0x2E), // XK_Delete
    (0xFF50, 0x24), // XK_Home
    (0xFF57, 0x23), // XK_End
    (0xFF55, 0x21), // XK_Page_Up
    (0xFF56, 0x22), // XK_Page_Down
    (0xFF61, 0x2C), // XK_Print
    (0xFF67, 0x5D), // XK_Menu
    // Arrows
    (0xFF51, 0x25), // XK_Left
    (0xFF52, 0x26), // XK_Up
    (0xFF53, 0x27), // XK_Right
    (0xFF54, 0x28), // XK_Down
    // Function keys F1-F24
    (0xFFBE, 0x70), // XK_F1
    (0xFFBF, 0x71), // XK_F2
    (0xFFC0, 0x72), // XK_F3
    (0xFFC1, 0x73), // XK_F4
    (0xFFC2, 0x74), // XK_F5
    (0xFFC3, 0x75), // XK_F6
    (0xFFC4, 0x76), // XK_F7
    (0xFFC5, 0x77), // XK_F8
    (0xFFC6, 0x78), // XK_F9
    (0xFFC7, 0x79), // XK_F10
    (0xFFC8, 0x7A), // XK_F11
    (0xFFC9, 0x7B), // XK_F12
    (0xFFCA, 0x7C), // XK_F13
    (0xFFCB, 0x7D), // XK_F14
    (0xFFCC, 0x7E), // XK_F15
    (0xFFCD, 0x7F), // XK_F16
    (0xFFCE, 0x80), // XK_F17
    (0xFFCF, 0x81), // XK_F18
    (0xFFD0, 0x82), // XK_F19
    (0xFFD1, 0x83), // XK_F20
    (0xFFD2, 0x84), // XK_F21
    (0xFFD3, 0x85), // XK_F22
    (0xFFD4, 0x86), // XK_F23
    (0xFFD5, 0x87), // XK_F24
    // Keypad
    (0xFF7F, 0x90), // XK_Num_Lock
    (0xFFAF, 0x6F), // XK_KP_Divide
    (0xFFAA, 0x6A), // XK_KP_Multiply
    (0xFFAD, 0x6D), // XK_KP_Subtract
    (0xFFAB, 0x6B), // XK_KP_Add
    (0xFFAC, 0x6C), // XK_KP_Separator
    (0xFFAE, 0x6E), // XK_KP_Decimal
    (0xFFB0, 0x60), // XK_KP_0
    (0xFFB1, 0x61), // XK_KP_1
    (0xFFB2, 0x62), // XK_KP_2
    (0xFFB3, 0x63), // XK_KP_3
    (0xFFB4, 0x64), // XK_KP_4
    (0xFFB5, 0x65), // XK_KP_5
    (0xFFB6, 0x66), // XK_KP_6
    (0xFFB7, 0x67), // XK_KP_7
    (0xFFB8, 0x68), // XK_KP_8
    (0xFFB9, 0x69), // XK_KP_9
    (XK_KP_ENTER, 0x0D), // shares VK_RETURN with XK_Return
    // Punctuation
    (0x002D, 0xBD), // XK_minus
    (0x003D, 0xBB), // XK_equal
    (0x005B, 0xDB), // XK_bracketleft
    (0x005D, 0xDD), // XK_bracketright
    (0x005C, 0xDC), // XK_backslash
    (0x003B, 0xBA), // XK_semicolon
    (0x0027, 0xDE), // XK_apostrophe
    (0x0060, 0xC0), // XK_grave
    (0x002C, 0xBC), // XK_comma
    (0x002E, 0xBE), // XK_period
    (0x002F, 0xBF), // XK_slash
    (0x003C, 0xE2), // XK_less (ISO key between left Shift and Z)
    // Modifiers
    (0xFFE1, 0xA0), // XK_Shift_L
    (0xFFE2, 0xA1), // XK_Shift_R
    (0xFFE3, 0xA2), // XK_Control_L
    (0xFFE4, 0xA3), // XK_Control_R
    (0xFFE9, 0xA4), // XK_Alt_L
    (0xFFEA, 0xA5), // XK_Alt_R
    (XK_ISO_LEVEL3_SHIFT, 0xA5), // AltGr reported as right Alt
    (0xFFEB, 0x5B), // XK_Super_L
    (0xFFEC, 0x5C), // XK_Super_R
    // XF86 media keys
    (0x1008_FF12, 0xAD), // XF86XK_AudioMute
    (0x1008_FF11, 0xAE), // XF86XK_AudioLowerVolume
    (0x1008_FF13, 0xAF), // XF86XK_AudioRaiseVolume
    (0x1008_FF17, 0xB0), // XF86XK_AudioNext
    (0x1008_FF16, 0xB1), // XF86XK_AudioPrev
    (0x1008_FF15, 0xB2), // XF86XK_AudioStop
    (0x1008_FF14, 0xB3), // XF86XK_AudioPlay
    (0x1008_FF2F, 0x5F), // XF86XK_Sleep
];
