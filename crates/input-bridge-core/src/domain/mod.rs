//! Pure pointer-domain logic: monitors, buttons, and coordinate mapping.
//!
//! Nothing here talks to the OS.  Pointer state that has to come from the
//! platform (current position, held button) is read through the
//! [`mapper::PointerQuery`] trait.

pub mod button;
pub mod mapper;
pub mod monitor;
