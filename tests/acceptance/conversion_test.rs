//! Epoch conversion behavior at the register window edges.

use rtc_common::CalendarError;
use rtc_time::{
    checked_datetime_from_epoch, datetime_from_epoch, epoch_from_datetime, ntp_to_unix,
    unix_to_ntp, Weekday, NTP_UNIX_EPOCH_OFFSET,
};

#[test]
fn vendor_test_timestamp_decomposes() {
    let dt = datetime_from_epoch(1_723_186_800);
    assert_eq!(dt.century, 1);
    assert_eq!((dt.year, dt.month, dt.day), (24, 8, 9));
    assert_eq!((dt.hour, dt.minute, dt.second), (7, 0, 0));
    assert_eq!(dt.day_of_week, Weekday::Friday);
}

#[test]
fn register_window_edges_roundtrip() {
    // First and last representable instants of the 2000-2099 window
    for epoch in [946_684_800_i64, 4_102_444_799] {
        let dt = checked_datetime_from_epoch(epoch).unwrap();
        assert_eq!(epoch_from_datetime(&dt).unwrap(), epoch);
    }

    assert!(matches!(
        checked_datetime_from_epoch(946_684_799),
        Err(CalendarError::YearOutOfRange { year: 1999 })
    ));
    assert!(matches!(
        checked_datetime_from_epoch(4_102_444_800),
        Err(CalendarError::YearOutOfRange { year: 2100 })
    ));
}

#[test]
fn ntp_epoch_conversions() {
    assert_eq!(unix_to_ntp(0).unwrap(), NTP_UNIX_EPOCH_OFFSET);
    assert_eq!(unix_to_ntp(1_723_186_800).unwrap(), 3_932_175_600);
    assert_eq!(ntp_to_unix(3_932_175_600).unwrap(), 1_723_186_800);

    assert!(matches!(
        ntp_to_unix(NTP_UNIX_EPOCH_OFFSET - 1),
        Err(CalendarError::NtpUnderflow { .. })
    ));
    let before_1900 = -(i64::try_from(NTP_UNIX_EPOCH_OFFSET).unwrap()) - 1;
    assert!(matches!(
        unix_to_ntp(before_1900),
        Err(CalendarError::PreEpochTime { .. })
    ));
}
