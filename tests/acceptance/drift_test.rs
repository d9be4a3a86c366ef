//! Drift measurement scenarios against a reference time feed.

use rtc_common::{CalendarError, DemoConfig};
use rtc_driver::{SimulatedCalendar, SntpTextSource};
use rtc_runtime::CalendarApp;
use rtc_time::DriftOutcome;
use std::time::Duration;

const SEED: i64 = 1_723_186_800;

fn demo_app() -> CalendarApp<SimulatedCalendar, SntpTextSource> {
    CalendarApp::new(
        SimulatedCalendar::new(),
        SntpTextSource::new(),
        DemoConfig::default(),
    )
}

#[test]
fn perfect_clock_shows_zero_drift() {
    let mut app = demo_app();
    app.initialize(SEED).unwrap();
    app.driver_mut().advance(Duration::from_secs(2));

    match app.compare_against_reference(&(SEED + 2).to_string()).unwrap() {
        DriftOutcome::Sample(sample) => assert_eq!(sample.difference_secs, 0),
        DriftOutcome::Skipped => panic!("fresh reference must be compared"),
    }
}

#[test]
fn fast_clock_shows_positive_drift() {
    let mut app = demo_app();
    app.initialize(SEED).unwrap();

    // Calendar advanced 7s while the reference says only 5s passed
    app.driver_mut().advance(Duration::from_secs(7));
    match app.compare_against_reference(&(SEED + 5).to_string()).unwrap() {
        DriftOutcome::Sample(sample) => assert_eq!(sample.difference_secs, 2),
        DriftOutcome::Skipped => panic!("fresh reference must be compared"),
    }
}

#[test]
fn stale_reference_is_skipped_until_it_moves() {
    let mut app = demo_app();
    app.initialize(SEED).unwrap();
    app.driver_mut().advance(Duration::from_secs(1));

    let raw = (SEED + 1).to_string();
    assert!(matches!(
        app.compare_against_reference(&raw).unwrap(),
        DriftOutcome::Sample(_)
    ));
    assert_eq!(
        app.compare_against_reference(&raw).unwrap(),
        DriftOutcome::Skipped
    );

    app.driver_mut().advance(Duration::from_secs(1));
    assert!(matches!(
        app.compare_against_reference(&(SEED + 2).to_string()).unwrap(),
        DriftOutcome::Sample(_)
    ));
}

#[test]
fn garbage_reference_is_rejected() {
    let mut app = demo_app();
    app.initialize(SEED).unwrap();

    assert!(matches!(
        app.compare_against_reference("??:??"),
        Err(CalendarError::InvalidReference(_))
    ));
}
