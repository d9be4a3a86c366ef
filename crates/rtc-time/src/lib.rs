//! Time codec for the Virtual RTC workspace.
//!
//! This crate provides:
//! - [`calendar`] module with the register-shaped [`CalendarDateTime`] and
//!   the epoch conversions in both directions
//! - [`ntp`] module with the fixed Unix/NTP epoch mapping
//! - [`drift`] module with the reference-time drift comparator
//!
//! Everything here is pure: no hardware access, no clocks, no side effects.

pub mod calendar;
pub mod drift;
pub mod ntp;

pub use calendar::*;
pub use drift::*;
pub use ntp::*;
