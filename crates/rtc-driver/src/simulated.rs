//! Simulated calendar peripheral.
//!
//! Keeps time as a millisecond-resolution epoch and fires the registered
//! trigger callbacks deterministically as [`SimulatedCalendar::advance`]
//! walks it forward. Used by unit tests, acceptance tests, and the daemon's
//! host demo mode.

use crate::{CalendarDriver, TriggerCallback};
use rtc_common::{CalendarError, CalendarResult, CalibrationConfig, ClockSource};
use rtc_time::{datetime_from_epoch, epoch_from_datetime, CalendarDateTime};
use std::time::Duration;
use tracing::debug;

/// Fault injection switches for driver tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedFaults {
    /// Reject the next `configure` call.
    pub configure: bool,
    /// Reject the next `set_datetime` call.
    pub set_datetime: bool,
    /// Reject the next `set_alarm` call.
    pub set_alarm: bool,
}

/// Simulated calendar peripheral for testing and host demos.
#[derive(Default)]
pub struct SimulatedCalendar {
    configured: Option<ClockSource>,
    initialized: bool,
    running: bool,
    /// Milliseconds since the Unix epoch, in the calendar's own wall clock.
    epoch_ms: i64,
    alarm: Option<CalendarDateTime>,
    /// Alarm match instant in whole seconds; cleared once fired (one-shot).
    armed_alarm_epoch: Option<i64>,
    calibration: Option<CalibrationConfig>,
    on_alarm: Option<TriggerCallback>,
    on_second: Option<TriggerCallback>,
    on_millisecond: Option<TriggerCallback>,
    faults: SimulatedFaults,
}

impl SimulatedCalendar {
    /// Create a stopped, unconfigured calendar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault injection switches (for testing).
    pub fn faults_mut(&mut self) -> &mut SimulatedFaults {
        &mut self.faults
    }

    /// The configured calibration, if any (for testing).
    #[must_use]
    pub fn calibration(&self) -> Option<&CalibrationConfig> {
        self.calibration.as_ref()
    }

    /// Walk the clock forward, firing trigger callbacks in hardware order:
    /// the millisecond trigger on every tick, the second trigger on each
    /// whole-second boundary, and the alarm (once) when its match instant
    /// is reached.
    ///
    /// Does nothing while the calendar is stopped, matching hardware.
    pub fn advance(&mut self, d: Duration) {
        if !self.running {
            return;
        }
        let ticks = i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
        for _ in 0..ticks {
            self.epoch_ms += 1;
            if let Some(cb) = self.on_millisecond.as_mut() {
                cb();
            }
            if self.epoch_ms % 1000 == 0 {
                if let Some(cb) = self.on_second.as_mut() {
                    cb();
                }
                let now_secs = self.epoch_ms.div_euclid(1000);
                if self.armed_alarm_epoch == Some(now_secs) {
                    self.armed_alarm_epoch = None;
                    if let Some(cb) = self.on_alarm.as_mut() {
                        cb();
                    }
                }
            }
        }
    }
}

impl CalendarDriver for SimulatedCalendar {
    fn configure(&mut self, source: ClockSource) -> CalendarResult<()> {
        if self.faults.configure {
            return Err(CalendarError::HardwareConfig(format!(
                "clock source {source:?} rejected"
            )));
        }
        self.configured = Some(source);
        debug!(?source, "simulated calendar configured");
        Ok(())
    }

    fn init(&mut self) -> CalendarResult<()> {
        if self.configured.is_none() {
            return Err(CalendarError::HardwareConfig(
                "init before clock source configuration".into(),
            ));
        }
        self.initialized = true;
        self.running = true;
        Ok(())
    }

    fn set_datetime(&mut self, dt: &CalendarDateTime) -> CalendarResult<()> {
        if self.faults.set_datetime {
            return Err(CalendarError::HardwareConfig(
                "date-time registers rejected".into(),
            ));
        }
        if !self.initialized {
            return Err(CalendarError::NotRunning);
        }
        let epoch = epoch_from_datetime(dt)?;
        self.epoch_ms = epoch * 1000 + i64::from(dt.millisecond);
        Ok(())
    }

    fn datetime(&self) -> CalendarResult<CalendarDateTime> {
        if !self.running {
            return Err(CalendarError::NotRunning);
        }
        let mut dt = datetime_from_epoch(self.epoch_ms.div_euclid(1000));
        dt.millisecond = self.epoch_ms.rem_euclid(1000) as u16;
        Ok(dt)
    }

    fn set_alarm(&mut self, dt: &CalendarDateTime) -> CalendarResult<()> {
        if self.faults.set_alarm {
            return Err(CalendarError::HardwareConfig("alarm registers rejected".into()));
        }
        let epoch = epoch_from_datetime(dt)?;
        self.alarm = Some(*dt);
        self.armed_alarm_epoch = Some(epoch);
        Ok(())
    }

    fn alarm(&self) -> CalendarResult<CalendarDateTime> {
        self.alarm
            .ok_or_else(|| CalendarError::Driver("alarm not configured".into()))
    }

    fn register_alarm_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()> {
        self.on_alarm = Some(cb);
        Ok(())
    }

    fn register_second_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()> {
        self.on_second = Some(cb);
        Ok(())
    }

    fn register_millisecond_callback(&mut self, cb: TriggerCallback) -> CalendarResult<()> {
        self.on_millisecond = Some(cb);
        Ok(())
    }

    fn start_calibration(&mut self, config: &CalibrationConfig) -> CalendarResult<()> {
        if !self.initialized {
            return Err(CalendarError::NotRunning);
        }
        self.calibration = Some(*config);
        Ok(())
    }

    fn start(&mut self) -> CalendarResult<()> {
        if !self.initialized {
            return Err(CalendarError::NotRunning);
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> CalendarResult<()> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const SEED: i64 = 1_723_215_600; // 2024-08-09 15:00:00 UTC

    fn running_calendar() -> SimulatedCalendar {
        let mut cal = SimulatedCalendar::new();
        cal.configure(ClockSource::Xtal32k).unwrap();
        cal.init().unwrap();
        cal.set_datetime(&datetime_from_epoch(SEED)).unwrap();
        cal
    }

    #[test]
    fn lifecycle() {
        let mut cal = SimulatedCalendar::new();
        assert!(!cal.is_running());
        // Init before configure is a hardware error
        assert!(cal.init().is_err());

        cal.configure(ClockSource::Rc32k).unwrap();
        cal.init().unwrap();
        assert!(cal.is_running());

        cal.stop().unwrap();
        assert!(!cal.is_running());
        assert_eq!(cal.datetime(), Err(CalendarError::NotRunning));

        cal.start().unwrap();
        assert!(cal.is_running());
    }

    #[test]
    fn keeps_time_across_advance() {
        let mut cal = running_calendar();
        cal.advance(Duration::from_millis(2500));

        let dt = cal.datetime().unwrap();
        assert_eq!(dt.second, 2);
        assert_eq!(dt.millisecond, 500);
        assert_eq!(epoch_from_datetime(&dt).unwrap(), SEED + 2);
    }

    #[test]
    fn fires_periodic_callbacks() {
        let mut cal = running_calendar();
        let seconds = Arc::new(AtomicU32::new(0));
        let millis = Arc::new(AtomicU32::new(0));

        let s = Arc::clone(&seconds);
        cal.register_second_callback(Box::new(move || {
            s.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();
        let m = Arc::clone(&millis);
        cal.register_millisecond_callback(Box::new(move || {
            m.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();

        cal.advance(Duration::from_millis(3000));
        assert_eq!(seconds.load(Ordering::Relaxed), 3);
        assert_eq!(millis.load(Ordering::Relaxed), 3000);
    }

    #[test]
    fn alarm_fires_once() {
        let mut cal = running_calendar();
        let fired = Arc::new(AtomicU32::new(0));
        let f = Arc::clone(&fired);
        cal.register_alarm_callback(Box::new(move || {
            f.fetch_add(1, Ordering::Relaxed);
        }))
        .unwrap();

        let alarm_at = datetime_from_epoch(SEED + 2);
        cal.set_alarm(&alarm_at).unwrap();
        assert_eq!(cal.alarm().unwrap(), alarm_at);

        cal.advance(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::Relaxed), 0);
        cal.advance(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::Relaxed), 1);
        // One-shot: stays fired-once however far time goes
        cal.advance(Duration::from_secs(5));
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn stopped_calendar_does_not_tick() {
        let mut cal = running_calendar();
        cal.stop().unwrap();
        cal.advance(Duration::from_secs(10));
        cal.start().unwrap();
        let dt = cal.datetime().unwrap();
        assert_eq!(epoch_from_datetime(&dt).unwrap(), SEED);
    }

    #[test]
    fn fault_injection() {
        let mut cal = SimulatedCalendar::new();
        cal.faults_mut().configure = true;
        assert!(matches!(
            cal.configure(ClockSource::Xtal32k),
            Err(CalendarError::HardwareConfig(_))
        ));
    }

    #[test]
    fn alarm_unconfigured_is_an_error() {
        let cal = running_calendar();
        assert!(matches!(cal.alarm(), Err(CalendarError::Driver(_))));
    }
}
