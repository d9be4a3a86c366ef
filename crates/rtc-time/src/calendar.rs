//! Epoch to calendar-register conversions.
//!
//! [`CalendarDateTime`] is a denormalized, hardware-register-shaped view of
//! an absolute instant. It carries no timezone of its own: callers pre-shift
//! the epoch before conversion when a non-UTC wall clock is wanted.
//!
//! The two-digit year register pins the representable window to 2000-2099.
//! The forward conversion is total; the inverse validates its input and
//! surfaces range violations instead of wrapping.

use rtc_common::{CalendarError, CalendarResult};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days in each month for a non-leap year.
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A day of the week, 0 = Sunday.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// Convert a raw register value to a weekday.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateTime` for values outside `0..=6`.
    pub fn from_u8(v: u8) -> CalendarResult<Self> {
        Ok(match v {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            6 => Self::Saturday,
            x => {
                return Err(CalendarError::InvalidDateTime {
                    field: "day_of_week",
                    value: u16::from(x),
                })
            }
        })
    }
}

/// Structure mirroring the calendar peripheral's date-time registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDateTime {
    /// Four-cycle century index, 1..=4 (register quirk, not a calendar
    /// century: `(year / 100) % 4 + 1` over the full Gregorian year).
    pub century: u8,
    /// Two-digit year within the century, 0..=99.
    pub year: u8,
    /// 1..=12, 1 is January.
    pub month: u8,
    /// 1..=31 depending on month.
    pub day: u8,
    /// 0..=23.
    pub hour: u8,
    /// 0..=59.
    pub minute: u8,
    /// 0..=59.
    pub second: u8,
    /// 0..=999.
    pub millisecond: u16,
    /// Derived from the date in the forward conversion.
    pub day_of_week: Weekday,
}

impl CalendarDateTime {
    /// Validate all register fields.
    ///
    /// The day of month is checked against 31 only, not against the actual
    /// month length; the peripheral accepts e.g. February 31st the same way.
    pub fn validate(&self) -> CalendarResult<()> {
        if self.year > 99 {
            Err(CalendarError::InvalidDateTime {
                field: "year",
                value: u16::from(self.year),
            })
        } else if self.month < 1 || self.month > 12 {
            Err(CalendarError::InvalidDateTime {
                field: "month",
                value: u16::from(self.month),
            })
        } else if self.day < 1 || self.day > 31 {
            Err(CalendarError::InvalidDateTime {
                field: "day",
                value: u16::from(self.day),
            })
        } else if self.hour > 23 {
            Err(CalendarError::InvalidDateTime {
                field: "hour",
                value: u16::from(self.hour),
            })
        } else if self.minute > 59 {
            Err(CalendarError::InvalidDateTime {
                field: "minute",
                value: u16::from(self.minute),
            })
        } else if self.second > 59 {
            Err(CalendarError::InvalidDateTime {
                field: "second",
                value: u16::from(self.second),
            })
        } else if self.millisecond > 999 {
            Err(CalendarError::InvalidDateTime {
                field: "millisecond",
                value: self.millisecond,
            })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for CalendarDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:02} {:02}:{:02}:{:02}.{:03} (century {})",
            self.day, self.month, self.year, self.hour, self.minute, self.second,
            self.millisecond, self.century
        )
    }
}

/// Returns `true` if `year` is a leap year (Gregorian).
#[inline]
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[inline]
fn days_in_month(month: usize, leap: bool) -> i64 {
    if month == 1 && leap {
        29
    } else {
        i64::from(DAYS_IN_MONTH[month])
    }
}

/// Four-cycle century index for a full Gregorian year.
#[must_use]
pub fn century_index(year: i64) -> u8 {
    ((year / 100) % 4 + 1) as u8
}

/// Convert seconds since the Unix epoch to the calendar register layout.
///
/// Total function: defined for any epoch value, including pre-1970 ones.
/// `millisecond` is always 0 since sub-second resolution is not derivable
/// from a whole-second input. The two-digit `year` and the `century` index
/// are lossy outside 2000-2099; see [`checked_datetime_from_epoch`] for the
/// range-checked variant used when writing the hardware.
#[must_use]
pub fn datetime_from_epoch(epoch: i64) -> CalendarDateTime {
    let mut rem = epoch % SECONDS_PER_DAY;
    let mut days = epoch / SECONDS_PER_DAY;
    if rem < 0 {
        rem += SECONDS_PER_DAY;
        days -= 1;
    }

    let second = (rem % 60) as u8;
    let minute = ((rem / 60) % 60) as u8;
    let hour = (rem / 3600) as u8;

    // 1970-01-01 was a Thursday
    let day_of_week = match ((days % 7 + 4) % 7 + 7) % 7 {
        0 => Weekday::Sunday,
        1 => Weekday::Monday,
        2 => Weekday::Tuesday,
        3 => Weekday::Wednesday,
        4 => Weekday::Thursday,
        5 => Weekday::Friday,
        _ => Weekday::Saturday,
    };

    // Walk years from 1970
    let mut year: i64 = 1970;
    let mut remaining_days = days;
    if remaining_days >= 0 {
        loop {
            let days_in_year: i64 = if is_leap_year(year) { 366 } else { 365 };
            if remaining_days < days_in_year {
                break;
            }
            remaining_days -= days_in_year;
            year += 1;
        }
    } else {
        loop {
            year -= 1;
            let days_in_year: i64 = if is_leap_year(year) { 366 } else { 365 };
            remaining_days += days_in_year;
            if remaining_days >= 0 {
                break;
            }
        }
    }

    // Walk months
    let leap = is_leap_year(year);
    let mut month = 0usize;
    while remaining_days >= days_in_month(month, leap) {
        remaining_days -= days_in_month(month, leap);
        month += 1;
    }

    CalendarDateTime {
        century: century_index(year),
        year: (year.rem_euclid(100)) as u8,
        month: (month + 1) as u8,
        day: (remaining_days + 1) as u8,
        hour,
        minute,
        second,
        millisecond: 0,
        day_of_week,
    }
}

/// Range-checked variant of [`datetime_from_epoch`].
///
/// # Errors
///
/// Returns `YearOutOfRange` when the instant's calendar year falls outside
/// the 2000-2099 window the two-digit year register can represent.
pub fn checked_datetime_from_epoch(epoch: i64) -> CalendarResult<CalendarDateTime> {
    let dt = datetime_from_epoch(epoch);
    let year = resolve_year_from_epoch(epoch);
    if (2000..=2099).contains(&year) {
        Ok(dt)
    } else {
        Err(CalendarError::YearOutOfRange { year })
    }
}

fn resolve_year_from_epoch(epoch: i64) -> i64 {
    let mut days = epoch.div_euclid(SECONDS_PER_DAY);
    let mut year: i64 = 1970;
    if days >= 0 {
        loop {
            let days_in_year: i64 = if is_leap_year(year) { 366 } else { 365 };
            if days < days_in_year {
                break;
            }
            days -= days_in_year;
            year += 1;
        }
    } else {
        while days < 0 {
            year -= 1;
            days += if is_leap_year(year) { 366 } else { 365 };
        }
    }
    year
}

/// Convert a calendar register reading back to seconds since the Unix epoch.
///
/// The two-digit `year` is interpreted as `2000 + year`; the window is a
/// design limit inherited from the register layout. `century` and
/// `day_of_week` are redundant in this direction and are not consulted - the
/// peripheral always supplies a self-consistent struct.
///
/// # Errors
///
/// Returns `InvalidDateTime` when any register field is out of range.
pub fn epoch_from_datetime(dt: &CalendarDateTime) -> CalendarResult<i64> {
    dt.validate()?;

    let year = 2000 + i64::from(dt.year);

    // Accumulated days from 1970-01-01 to the start of `year`
    let mut days: i64 = 0;
    for y in 1970..year {
        days += if is_leap_year(y) { 366 } else { 365 };
    }

    let leap = is_leap_year(year);
    for m in 0..usize::from(dt.month - 1) {
        days += days_in_month(m, leap);
    }
    days += i64::from(dt.day) - 1;

    Ok(days * SECONDS_PER_DAY
        + i64::from(dt.hour) * 3600
        + i64::from(dt.minute) * 60
        + i64::from(dt.second))
}
