//! Network time collaborator abstraction.
//!
//! The calendar demo compares the hardware clock against an SNTP-style
//! reference. The transport and wire format live outside this workspace;
//! what arrives here is the raw text payload the transport handed over.

use rtc_common::{CalendarError, CalendarResult};
use std::collections::VecDeque;

/// Source of reference epoch samples.
pub trait ReferenceTimeSource: Send {
    /// Extract a Unix epoch from a raw reference sample.
    ///
    /// A source that has no fresh sample returns the same epoch as last
    /// call; the drift comparator treats that as "skip", not as an error.
    fn reference_time(&mut self, raw: &str) -> CalendarResult<i64>;
}

/// Parses the reference epoch from a decimal-seconds text payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct SntpTextSource;

impl SntpTextSource {
    /// Create a new text-parsing source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceTimeSource for SntpTextSource {
    fn reference_time(&mut self, raw: &str) -> CalendarResult<i64> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| CalendarError::InvalidReference(raw.trim().to_owned()))
    }
}

/// Scripted reference source for testing.
///
/// Returns queued samples in order; once the queue is drained it keeps
/// returning the last sample, modeling a reference that has stopped
/// advancing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReference {
    queue: VecDeque<i64>,
    last: i64,
}

impl ScriptedReference {
    /// Create a scripted source from a sample sequence.
    pub fn new(samples: impl IntoIterator<Item = i64>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
            last: 0,
        }
    }

    /// Append a sample to the script.
    pub fn push(&mut self, sample: i64) {
        self.queue.push_back(sample);
    }
}

impl ReferenceTimeSource for ScriptedReference {
    fn reference_time(&mut self, _raw: &str) -> CalendarResult<i64> {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        Ok(self.last)
    }
}
