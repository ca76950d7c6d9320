//! Key code translation tables between native platform codes and the canonical
//! key vocabulary used on the channel.
//!
//! The canonical space is Windows Virtual-Key numbering (`VK_*`).  The remote
//! host speaks VK codes; every platform translates to and from them at the
//! injection and capture boundaries.
//!
//! # Table contract
//!
//! * Every native code listed in a table translates to exactly one canonical code.
//! * Reverse translation may be many-to-one.  Two kinds of exception to strict
//!   bijectivity exist, and each one is listed by name in its table:
//!   - **collapses**: canonical codes that reverse to a native code whose own
//!     forward translation is a different canonical code (e.g. `VK_LSHIFT` on
//!     macOS, which only has one generic left Shift key code);
//!   - **native aliases**: native codes whose forward translation reverses to a
//!     different native code (e.g. macOS keypad Enter, which shares `VK_RETURN`
//!     with the main Return key).
//! * Unmapped codes are a normal outcome and come back as `None`.

pub mod linux_x11;
pub mod macos_cg;
pub mod windows_vk;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformKind;

/// A platform-native key code (macOS `CGKeyCode`, X11 KeySym, or Windows VK).
pub type NativeKeyCode = u32;

/// A platform-neutral key identifier in Windows Virtual-Key numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKeyCode(pub u16);

impl CanonicalKeyCode {
    /// Returns the raw VK value.
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CanonicalKeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VK 0x{:02X}", self.0)
    }
}

/// Compiled-in description of one platform's key table.
#[derive(Debug)]
pub struct KeyTableDef {
    /// Platform whose native codes this table covers.
    pub platform: PlatformKind,
    /// `(native, canonical)` pairs.  Native codes must be unique.
    pub entries: &'static [(NativeKeyCode, u16)],
    /// Native codes whose canonical code reverses to another native code.
    pub native_aliases: &'static [NativeKeyCode],
    /// `(canonical, native)` pairs added to the reverse direction only.
    pub collapses: &'static [(u16, NativeKeyCode)],
}

/// Bidirectional lookup built once from a [`KeyTableDef`].
///
/// Immutable after construction; share it freely between readers.
#[derive(Debug, Clone)]
pub struct KeyCodeTable {
    platform: PlatformKind,
    forward: HashMap<NativeKeyCode, CanonicalKeyCode>,
    reverse: HashMap<CanonicalKeyCode, NativeKeyCode>,
    native_aliases: &'static [NativeKeyCode],
    collapses: &'static [(u16, NativeKeyCode)],
}

impl KeyCodeTable {
    /// Builds the lookup maps from a static table definition.
    pub fn from_def(def: &'static KeyTableDef) -> Self {
        let mut forward = HashMap::with_capacity(def.entries.len());
        let mut reverse = HashMap::with_capacity(def.entries.len() + def.collapses.len());

        for &(native, canonical) in def.entries {
            let canonical = CanonicalKeyCode(canonical);
            let previous = forward.insert(native, canonical);
            debug_assert!(previous.is_none(), "duplicate native code 0x{native:X}");
            if !def.native_aliases.contains(&native) {
                reverse.entry(canonical).or_insert(native);
            }
        }
        for &(canonical, native) in def.collapses {
            reverse.entry(CanonicalKeyCode(canonical)).or_insert(native);
        }

        Self {
            platform: def.platform,
            forward,
            reverse,
            native_aliases: def.native_aliases,
            collapses: def.collapses,
        }
    }

    /// macOS `CGKeyCode` table.
    pub fn macos() -> Self {
        Self::from_def(&macos_cg::MACOS_TABLE)
    }

    /// X11 KeySym table.
    pub fn x11() -> Self {
        Self::from_def(&linux_x11::X11_TABLE)
    }

    /// Windows VK table (identity over the known key set).
    pub fn windows() -> Self {
        Self::from_def(&windows_vk::WINDOWS_TABLE)
    }

    /// Table for the given platform.
    pub fn for_platform(platform: PlatformKind) -> Self {
        match platform {
            PlatformKind::Macos => Self::macos(),
            PlatformKind::X11 => Self::x11(),
            PlatformKind::Windows => Self::windows(),
        }
    }

    /// Platform whose native codes this table covers.
    pub fn platform(&self) -> PlatformKind {
        self.platform
    }

    /// Translates a native key code into the canonical vocabulary.
    ///
    /// Returns `None` when the code has no canonical counterpart.
    pub fn translate(&self, native: NativeKeyCode) -> Option<CanonicalKeyCode> {
        self.forward.get(&native).copied()
    }

    /// Translates a canonical key code into this platform's native code.
    ///
    /// Returns `None` when the platform has no key for it.
    pub fn reverse_translate(&self, canonical: CanonicalKeyCode) -> Option<NativeKeyCode> {
        self.reverse.get(&canonical).copied()
    }

    /// Native codes that do not survive a forward-then-reverse round trip.
    pub fn native_aliases(&self) -> &'static [NativeKeyCode] {
        self.native_aliases
    }

    /// Canonical codes folded onto a native key owned by another canonical code.
    pub fn collapses(&self) -> &'static [(u16, NativeKeyCode)] {
        self.collapses
    }

    /// Iterates over every native code the table knows.
    pub fn native_codes(&self) -> impl Iterator<Item = NativeKeyCode> + '_ {
        self.forward.keys().copied()
    }

    /// Number of native codes in the table.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> Vec<KeyCodeTable> {
        vec![KeyCodeTable::macos(), KeyCodeTable::x11(), KeyCodeTable::windows()]
    }

    #[test]
    fn test_round_trip_holds_for_every_native_code_except_listed_aliases() {
        for table in all_tables() {
            for native in table.native_codes() {
                if table.native_aliases().contains(&native) {
                    continue;
                }
                // Arrange / Act
                let canonical = table.translate(native).expect("listed code must translate");
                let back = table.reverse_translate(canonical);

                // Assert
                assert_eq!(
                    back,
                    Some(native),
                    "{:?}: 0x{native:X} -> {canonical} -> {back:?}",
                    table.platform()
                );
            }
        }
    }

    #[test]
    fn test_every_native_alias_reverses_to_a_different_native_code() {
        for table in all_tables() {
            for &alias in table.native_aliases() {
                let canonical = table.translate(alias).expect("alias must translate");
                let back = table.reverse_translate(canonical).expect("alias target must exist");
                let platform = table.platform();
                assert_ne!(back, alias, "{platform:?}: 0x{alias:X} is listed as an alias");
            }
        }
    }

    #[test]
    fn test_every_collapse_reverses_onto_a_key_owned_by_another_canonical_code() {
        for table in all_tables() {
            for &(canonical, native) in table.collapses() {
                let canonical = CanonicalKeyCode(canonical);
                assert_eq!(table.reverse_translate(canonical), Some(native));
                assert_ne!(
                    table.translate(native),
                    Some(canonical),
                    "{:?}: {canonical} is listed as a collapse but owns 0x{native:X}",
                    table.platform()
                );
            }
        }
    }

    #[test]
    fn test_tables_cover_hundreds_of_keys_in_total() {
        let total: usize = all_tables().iter().map(KeyCodeTable::len).sum();
        assert!(total >= 300, "only {total} entries across tables");
    }

    #[test]
    fn test_unmapped_codes_return_none_instead_of_failing() {
        let table = KeyCodeTable::macos();
        assert_eq!(table.translate(0xFFFF), None);
        assert_eq!(table.reverse_translate(CanonicalKeyCode(0x07)), None);
    }

    #[test]
    fn test_for_platform_selects_matching_table() {
        for platform in [PlatformKind::Macos, PlatformKind::X11, PlatformKind::Windows] {
            assert_eq!(KeyCodeTable::for_platform(platform).platform(), platform);
        }
    }

    #[test]
    fn test_canonical_key_code_display_is_hex_vk() {
        assert_eq!(CanonicalKeyCode(0x0D).to_string(), "VK 0x0D");
    }
}
