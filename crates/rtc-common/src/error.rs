//! Error types for the Virtual RTC workspace.

use thiserror::Error;

/// Calendar error types covering hardware configuration, conversion range
/// violations, and collaborator failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The peripheral rejected a configuration value.
    ///
    /// Fatal to the initialization step that produced it; the orchestrator
    /// aborts the remaining init sequence on the first occurrence.
    #[error("hardware configuration rejected: {0}")]
    HardwareConfig(String),

    /// A driver operation was attempted while the calendar is not running.
    #[error("calendar peripheral is not running")]
    NotRunning,

    /// A datetime field is outside its register range.
    #[error("invalid {field} value {value}")]
    InvalidDateTime {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was given.
        value: u16,
    },

    /// Calendar year outside the representable 2000-2099 window.
    ///
    /// The two-digit year register permanently limits the calendar to this
    /// window; the limit is surfaced rather than silently wrapped since a
    /// wrapped epoch would corrupt drift reporting.
    #[error("calendar year {year} outside supported 2000-2099 window")]
    YearOutOfRange {
        /// The full Gregorian year that was requested.
        year: i64,
    },

    /// NTP-to-Unix conversion underflow (timestamp before 1970).
    #[error("NTP timestamp {ntp} predates the Unix epoch")]
    NtpUnderflow {
        /// The NTP timestamp that was given.
        ntp: u64,
    },

    /// Unix-to-NTP conversion underflow (timestamp before 1900).
    #[error("Unix timestamp {unix} predates the NTP epoch")]
    PreEpochTime {
        /// The Unix timestamp that was given.
        unix: i64,
    },

    /// The network time collaborator returned an unparseable sample.
    #[error("invalid reference time sample: {0}")]
    InvalidReference(String),

    /// Generic driver failure.
    #[error("driver error: {0}")]
    Driver(String),
}

/// Convenience type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
