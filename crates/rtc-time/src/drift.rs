//! Drift comparison between the hardware calendar and a network reference.

use crate::calendar::{epoch_from_datetime, CalendarDateTime};
use rtc_common::CalendarResult;

/// One drift measurement, computed fresh on each comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriftSample {
    /// The calendar reading converted to a Unix epoch.
    pub local_epoch: i64,
    /// The raw reference epoch (before the timezone shift).
    pub reference_epoch: i64,
    /// `local - (reference + shift)`; positive means the local clock is ahead.
    pub difference_secs: i64,
}

/// Outcome of a comparison call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftOutcome {
    /// A fresh reference sample was available and was compared.
    Sample(DriftSample),
    /// The reference source returned the same value as last call; nothing
    /// was compared. Not an error - the reference simply updates less often
    /// than the comparator is polled.
    Skipped,
}

/// Compares the hardware calendar against a network time reference.
///
/// Retains only the last reference epoch seen (seeded to zero), to suppress
/// redundant comparisons while the reference has not advanced.
#[derive(Debug, Clone)]
pub struct DriftComparator {
    timezone_shift_secs: i64,
    last_reference_epoch: i64,
}

impl DriftComparator {
    /// Create a comparator with the given fixed timezone shift.
    #[must_use]
    pub fn new(timezone_shift_secs: i64) -> Self {
        Self {
            timezone_shift_secs,
            last_reference_epoch: 0,
        }
    }

    /// Compare a freshly obtained reference epoch against the current
    /// calendar reading.
    ///
    /// # Errors
    ///
    /// Returns an error when the calendar reading has out-of-range fields.
    pub fn compare(
        &mut self,
        reference_epoch: i64,
        reading: &CalendarDateTime,
    ) -> CalendarResult<DriftOutcome> {
        if reference_epoch == self.last_reference_epoch {
            return Ok(DriftOutcome::Skipped);
        }
        self.last_reference_epoch = reference_epoch;

        let shifted = reference_epoch + self.timezone_shift_secs;
        let local_epoch = epoch_from_datetime(reading)?;

        Ok(DriftOutcome::Sample(DriftSample {
            local_epoch,
            reference_epoch,
            difference_secs: local_epoch - shifted,
        }))
    }

    /// The last reference epoch a comparison was performed against.
    #[must_use]
    pub fn last_reference_epoch(&self) -> i64 {
        self.last_reference_epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::datetime_from_epoch;

    const SHIFT: i64 = 28_800; // UTC+8
    const REFERENCE: i64 = 1_723_186_800;

    #[test]
    fn sign_convention_local_ahead() {
        let mut cmp = DriftComparator::new(SHIFT);
        // Local calendar reads 5 seconds ahead of the shifted reference
        let reading = datetime_from_epoch(REFERENCE + SHIFT + 5);

        match cmp.compare(REFERENCE, &reading).unwrap() {
            DriftOutcome::Sample(sample) => {
                assert_eq!(sample.difference_secs, 5);
                assert_eq!(sample.reference_epoch, REFERENCE);
                assert_eq!(sample.local_epoch, REFERENCE + SHIFT + 5);
            }
            DriftOutcome::Skipped => panic!("fresh reference must be compared"),
        }
    }

    #[test]
    fn local_behind_is_negative() {
        let mut cmp = DriftComparator::new(SHIFT);
        let reading = datetime_from_epoch(REFERENCE + SHIFT - 3);
        match cmp.compare(REFERENCE, &reading).unwrap() {
            DriftOutcome::Sample(sample) => assert_eq!(sample.difference_secs, -3),
            DriftOutcome::Skipped => panic!("fresh reference must be compared"),
        }
    }

    #[test]
    fn repeated_reference_is_skipped() {
        let mut cmp = DriftComparator::new(SHIFT);
        let reading = datetime_from_epoch(REFERENCE + SHIFT);

        assert!(matches!(
            cmp.compare(REFERENCE, &reading).unwrap(),
            DriftOutcome::Sample(_)
        ));
        assert_eq!(
            cmp.compare(REFERENCE, &reading).unwrap(),
            DriftOutcome::Skipped
        );
        // A newer sample resumes comparison
        assert!(matches!(
            cmp.compare(REFERENCE + 10, &reading).unwrap(),
            DriftOutcome::Sample(_)
        ));
        assert_eq!(cmp.last_reference_epoch(), REFERENCE + 10);
    }

    #[test]
    fn zero_shift() {
        let mut cmp = DriftComparator::new(0);
        let reading = datetime_from_epoch(REFERENCE);
        match cmp.compare(REFERENCE, &reading).unwrap() {
            DriftOutcome::Sample(sample) => assert_eq!(sample.difference_secs, 0),
            DriftOutcome::Skipped => panic!("fresh reference must be compared"),
        }
    }

    #[test]
    fn bad_reading_is_an_error() {
        let mut cmp = DriftComparator::new(SHIFT);
        let mut reading = datetime_from_epoch(REFERENCE + SHIFT);
        reading.hour = 24;
        assert!(cmp.compare(REFERENCE, &reading).is_err());
    }
}
