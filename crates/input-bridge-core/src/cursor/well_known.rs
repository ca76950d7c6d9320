//! The standard system cursor set and its fixed identifiers.
//!
//! Identifiers are the Windows `IDC_*` resource ids.  Every platform maps its
//! own stock cursors onto this set so the receiver can draw a well-known
//! cursor from a local resource instead of a transmitted bitmap.

/// A standard system cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WellKnownCursor {
    Arrow = 32512,
    IBeam = 32513,
    Wait = 32514,
    Cross = 32515,
    UpArrow = 32516,
    Size = 32640,
    Icon = 32641,
    SizeNwse = 32642,
    SizeNesw = 32643,
    SizeWe = 32644,
    SizeNs = 32645,
    SizeAll = 32646,
    No = 32648,
    Hand = 32649,
    AppStarting = 32650,
    Help = 32651,
    Pin = 32671,
    Person = 32672,
}

impl WellKnownCursor {
    pub const ALL: [WellKnownCursor; 18] = [
        Self::Arrow,
        Self::IBeam,
        Self::Wait,
        Self::Cross,
        Self::UpArrow,
        Self::Size,
        Self::Icon,
        Self::SizeNwse,
        Self::SizeNesw,
        Self::SizeWe,
        Self::SizeNs,
        Self::SizeAll,
        Self::No,
        Self::Hand,
        Self::AppStarting,
        Self::Help,
        Self::Pin,
        Self::Person,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// `true` if `id` falls on one of the reserved well-known identifiers.
    pub fn is_reserved_id(id: u32) -> bool {
        Self::from_id(id).is_some()
    }
}
