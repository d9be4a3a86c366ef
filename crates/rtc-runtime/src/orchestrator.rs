//! Calendar demo orchestrator.
//!
//! [`CalendarApp`] owns the peripheral driver and the reference time source,
//! runs the startup sequence (clock source, seed date-time, calibration,
//! alarm, trigger hooks, conversion demo), and services the trigger latches
//! from the poll loop. Hardware errors abort startup at the first failing
//! step and propagate unchanged.

use crate::TriggerBridge;
use rtc_common::{CalendarResult, DemoConfig};
use rtc_driver::{CalendarDriver, ReferenceTimeSource};
use rtc_time::{
    checked_datetime_from_epoch, ntp_to_unix, unix_to_ntp, DriftComparator, DriftOutcome,
};
use tracing::{debug, info};

/// Which triggers a single poll-loop pass observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessedTriggers {
    /// The alarm latch was set.
    pub alarm: bool,
    /// The one-second latch was set.
    pub second: bool,
    /// The one-millisecond latch was set.
    pub millisecond: bool,
}

/// The calendar demo application.
pub struct CalendarApp<D, S> {
    driver: D,
    reference: S,
    config: DemoConfig,
    bridge: TriggerBridge,
    drift: DriftComparator,
    /// Second latches drained since the last periodic time report.
    seconds_since_report: u32,
}

impl<D: CalendarDriver, S: ReferenceTimeSource> CalendarApp<D, S> {
    /// Create an application over a driver and a reference time source.
    pub fn new(driver: D, reference: S, config: DemoConfig) -> Self {
        let bridge = TriggerBridge::new(&config.triggers);
        let drift = DriftComparator::new(config.timezone_shift_secs);
        Self {
            driver,
            reference,
            config,
            bridge,
            drift,
            seconds_since_report: 0,
        }
    }

    /// Run the startup sequence against the peripheral.
    ///
    /// `seed_epoch` is the UTC Unix epoch to load into the date-time
    /// registers; the configured timezone shift is applied before the write
    /// so the calendar keeps local wall time. Each enabled demo feature is
    /// brought up in turn; the first hardware failure aborts the remaining
    /// steps.
    pub fn initialize(&mut self, seed_epoch: i64) -> CalendarResult<()> {
        info!(seed_epoch, source = ?self.config.clock_source, "initializing calendar");
        self.driver.configure(self.config.clock_source)?;
        self.driver.init()?;

        let local_epoch = seed_epoch + self.config.timezone_shift_secs;
        let seed = checked_datetime_from_epoch(local_epoch)?;
        self.driver.set_datetime(&seed)?;
        let now = self.driver.datetime()?;
        info!(%now, "calendar date-time set");

        if self.config.demos.calibration {
            self.driver.start_calibration(&self.config.calibration)?;
            self.driver.start()?;
            info!("clock calibration started");
        }

        if self.config.demos.alarm {
            let alarm_epoch = local_epoch + i64::from(self.config.alarm.offset_secs);
            let alarm = checked_datetime_from_epoch(alarm_epoch)?;
            self.driver.set_alarm(&alarm)?;
            self.driver.register_alarm_callback(self.bridge.alarm_hook())?;
            let armed = self.driver.alarm()?;
            info!(%armed, "alarm armed");
        }

        if self.config.demos.second_trigger {
            self.driver.register_second_callback(self.bridge.second_hook())?;
            debug!(period = self.config.triggers.second_period, "one-second trigger enabled");
        }

        if self.config.demos.millisecond_trigger {
            self.driver
                .register_millisecond_callback(self.bridge.millisecond_hook())?;
            debug!(
                period = self.config.triggers.millisecond_period,
                "one-millisecond trigger enabled"
            );
        }

        if self.config.demos.time_conversion {
            self.run_conversion_demo(seed_epoch)?;
        }

        Ok(())
    }

    /// Demonstrate the Unix/NTP epoch conversions on the seed timestamp.
    fn run_conversion_demo(&self, unix_epoch: i64) -> CalendarResult<()> {
        let ntp_epoch = unix_to_ntp(unix_epoch)?;
        let round_trip = ntp_to_unix(ntp_epoch)?;
        info!(unix_epoch, ntp_epoch, round_trip, "unix/ntp conversion demo");
        Ok(())
    }

    /// Drain the trigger latches once.
    ///
    /// Each latch set since the previous pass is observed exactly once. The
    /// periodic time report reads the date-time registers every
    /// `report_period` drained second latches.
    pub fn process_pending_triggers(&mut self) -> CalendarResult<ProcessedTriggers> {
        let mut processed = ProcessedTriggers::default();

        if self.bridge.take_alarm() {
            processed.alarm = true;
            info!("alarm trigger fired");
        }

        if self.bridge.take_second() {
            processed.second = true;
            self.seconds_since_report += 1;
            if self.seconds_since_report >= self.config.triggers.report_period.max(1) {
                self.seconds_since_report = 0;
                let now = self.driver.datetime()?;
                info!(%now, "periodic time report");
            }
        }

        if self.bridge.take_millisecond() {
            processed.millisecond = true;
            debug!(
                period = self.config.triggers.millisecond_period,
                "millisecond trigger period elapsed"
            );
        }

        Ok(processed)
    }

    /// Compare the calendar against a raw reference time sample.
    ///
    /// The reference epoch is extracted by the configured source; a sample
    /// identical to the previous one is skipped rather than compared.
    pub fn compare_against_reference(&mut self, raw: &str) -> CalendarResult<DriftOutcome> {
        let reference_epoch = self.reference.reference_time(raw)?;
        let reading = self.driver.datetime()?;
        let outcome = self.drift.compare(reference_epoch, &reading)?;
        match &outcome {
            DriftOutcome::Sample(sample) => {
                info!(
                    calendar_epoch = sample.local_epoch,
                    reference_epoch = sample.reference_epoch,
                    difference_secs = sample.difference_secs,
                    "drift sample"
                );
            }
            DriftOutcome::Skipped => {
                debug!(reference_epoch, "reference unchanged, comparison skipped");
            }
        }
        Ok(outcome)
    }

    /// Stop the calendar peripheral.
    pub fn shutdown(&mut self) -> CalendarResult<()> {
        self.driver.stop()?;
        info!("calendar stopped");
        Ok(())
    }

    /// The trigger bridge (for consumers blocking on updates).
    #[must_use]
    pub fn bridge(&self) -> &TriggerBridge {
        &self.bridge
    }

    /// The owned driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }
}
