//! Peripheral abstractions for the calendar demo.
//!
//! This crate provides:
//! - [`CalendarDriver`] trait for abstracting the calendar peripheral
//! - [`ReferenceTimeSource`] trait for the network time collaborator
//! - [`simulated`] module with an in-memory calendar that fires trigger
//!   callbacks deterministically
//! - [`reference`] module with text-parsing and scripted reference sources

pub mod reference;
pub mod simulated;

pub use reference::*;
pub use simulated::*;

use rtc_common::{CalendarResult, CalibrationConfig, ClockSource};
use rtc_time::CalendarDateTime;

/// A trigger callback registered with the peripheral.
///
/// Runs in interrupt context on real hardware; implementations must keep it
/// short and touch only state designed for that (atomic latches).
pub type TriggerCallback = Box<dyn FnMut() + Send>;

/// Calendar peripheral abstraction.
///
/// This trait defines the register-level surface of the hardware calendar,
/// allowing the orchestrator to run against the real vendor driver or the
/// simulated one through a common interface. All operations are synchronous.
pub trait CalendarDriver: Send {
    /// Select the clock source feeding the calendar.
    ///
    /// Must be called before [`init`](CalendarDriver::init); the peripheral
    /// rejects sources it cannot lock onto.
    fn configure(&mut self, source: ClockSource) -> CalendarResult<()>;

    /// Initialize the calendar peripheral and start it counting.
    fn init(&mut self) -> CalendarResult<()>;

    /// Load the date-time registers.
    fn set_datetime(&mut self, dt: &CalendarDateTime) -> CalendarResult<()>;

    /// Read the current date-time registers.
    fn datetime(&self) -> CalendarResult<CalendarDateTime>;

    /// Arm the alarm with the given date-time match value.
    fn set_alarm(&mut self, dt: &CalendarDateTime) -> CalendarResult<()>;

    /// Read back the configured alarm registers.
    fn alarm(&self) -> CalendarResult<CalendarDateTime>;

    /// Register the alarm trigger callback.
    fn register_alarm_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()>;

    /// Register the one-second trigger callback.
    fn register_second_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()>;

    /// Register the one-millisecond trigger callback.
    fn register_millisecond_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()>;

    /// Start RC/RO clock calibration.
    fn start_calibration(&mut self, config: &CalibrationConfig) -> CalendarResult<()>;

    /// Start the calendar counting.
    fn start(&mut self) -> CalendarResult<()>;

    /// Stop the calendar.
    fn stop(&mut self) -> CalendarResult<()>;

    /// Check if the calendar is counting.
    fn is_running(&self) -> bool {
        true
    }
}
