//! Unix/NTP epoch mapping.
//!
//! NTP counts seconds from 1900-01-01T00:00:00Z, Unix from
//! 1970-01-01T00:00:00Z; the two are a fixed constant apart. Timestamps
//! before the respective epoch are signaled as typed range errors rather
//! than wrapped, since a wrapped value would corrupt drift reporting.

use rtc_common::{CalendarError, CalendarResult};

/// Seconds between 1900-01-01 and 1970-01-01.
pub const NTP_UNIX_EPOCH_OFFSET: u64 = 2_208_988_800;

/// Convert a Unix timestamp to NTP seconds.
///
/// # Errors
///
/// Returns `PreEpochTime` for instants before 1900-01-01.
pub fn unix_to_ntp(unix: i64) -> CalendarResult<u64> {
    let offset = NTP_UNIX_EPOCH_OFFSET as i64;
    if unix < -offset {
        return Err(CalendarError::PreEpochTime { unix });
    }
    // The sum exceeds i64::MAX near the top of the input range; widen so
    // the conversion stays total for every non-rejected input
    Ok((i128::from(unix) + i128::from(NTP_UNIX_EPOCH_OFFSET)) as u64)
}

/// Convert NTP seconds to a Unix timestamp.
///
/// # Errors
///
/// Returns `NtpUnderflow` for instants before 1970-01-01.
pub fn ntp_to_unix(ntp: u64) -> CalendarResult<i64> {
    if ntp < NTP_UNIX_EPOCH_OFFSET {
        return Err(CalendarError::NtpUnderflow { ntp });
    }
    // NTP second counts from any realistic source fit comfortably in i64
    Ok((ntp - NTP_UNIX_EPOCH_OFFSET) as i64)
}
