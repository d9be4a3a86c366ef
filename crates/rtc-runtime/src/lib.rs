//! Calendar demo runtime.
//!
//! This crate provides:
//! - [`bridge`] module with the interrupt-to-poll trigger bridge
//! - [`orchestrator`] module with [`CalendarApp`], the startup sequence and
//!   poll-loop driver for the calendar demo

pub mod bridge;
pub mod orchestrator;

pub use bridge::*;
pub use orchestrator::*;
