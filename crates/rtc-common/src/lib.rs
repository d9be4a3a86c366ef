//! Common types shared across the Virtual RTC workspace.
//!
//! This crate provides:
//! - [`config`] module with the runtime demo configuration (TOML)
//! - [`error`] module with the workspace-wide error type

pub mod config;
pub mod error;

pub use config::*;
pub use error::*;
