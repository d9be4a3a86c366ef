//! Calendar daemon entry point.
//!
//! Runs the calendar demo against the simulated peripheral: seeds the
//! clock, arms the alarm, services the trigger latches from a poll loop,
//! and compares the calendar against a synthesized reference feed, with
//! signal handling for clean shutdown.

mod signals;

use anyhow::{Context, Result};
use clap::Parser;
use rtc_common::DemoConfig;
use rtc_driver::{CalendarDriver, ReferenceTimeSource, SimulatedCalendar, SntpTextSource};
use rtc_runtime::CalendarApp;
use rtc_time::epoch_from_datetime;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::signals::SignalHandler;

/// Default seed timestamp: 2024-08-09 07:00:00 UTC.
const DEFAULT_SEED_EPOCH: i64 = 1_723_186_800;

/// Calendar daemon command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "rtc-daemon",
    about = "Virtual RTC daemon - hardware calendar demo runner",
    version,
    long_about = None
)]
struct Args {
    /// Path to a demo configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// UTC Unix epoch to seed the calendar with.
    #[arg(long, default_value_t = DEFAULT_SEED_EPOCH)]
    seed_epoch: i64,

    /// Maximum simulated seconds to run (0 = infinite).
    #[arg(long, default_value = "0")]
    max_seconds: u64,

    /// Poll interval override (e.g. "250ms"), takes precedence over config.
    #[arg(long, value_parser = humantime::parse_duration)]
    poll_interval: Option<Duration>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting calendar daemon");

    let mut config = load_config(&args)?;
    if let Some(poll_interval) = args.poll_interval {
        config.poll_interval = poll_interval;
    }
    info!(
        ?config.clock_source,
        timezone_shift_secs = config.timezone_shift_secs,
        "Configuration loaded"
    );

    let signal_handler = SignalHandler::install().context("Failed to set up signal handlers")?;

    run_daemon(config, &signal_handler, args.seed_epoch, args.max_seconds)
}

/// Initialize logging with the specified log level.
fn init_logging(level: &str) {
    let filter = format!(
        "rtc_daemon={},rtc_runtime={},rtc_driver={},rtc_time={},rtc_common={}",
        level, level, level, level, level
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&filter)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Load configuration from file or use defaults.
///
/// Resolution priority (first existing file wins):
/// 1. Command-line `--config` argument
/// 2. `RTC_CONFIG_PATH` environment variable
/// 3. `/etc/rtc/config.toml` (system path)
/// 4. `config/default.toml` (local development)
/// 5. Built-in defaults
fn load_config(args: &Args) -> Result<DemoConfig> {
    if let Some(config_path) = &args.config {
        info!(?config_path, "Loading config from command-line argument");
        return DemoConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path));
    }

    if let Ok(env_path) = std::env::var("RTC_CONFIG_PATH") {
        let config_path = PathBuf::from(&env_path);
        if config_path.exists() {
            info!(?config_path, "Loading config from RTC_CONFIG_PATH");
            return DemoConfig::from_file(&config_path).with_context(|| {
                format!("Failed to load config from RTC_CONFIG_PATH={:?}", env_path)
            });
        }
        warn!(
            path = %env_path,
            "RTC_CONFIG_PATH set but file does not exist, checking other locations"
        );
    }

    let system_path = PathBuf::from("/etc/rtc/config.toml");
    if system_path.exists() {
        info!(?system_path, "Loading config from system path");
        return DemoConfig::from_file(&system_path)
            .with_context(|| format!("Failed to load config from {:?}", system_path));
    }

    let local_path = PathBuf::from("config/default.toml");
    if local_path.exists() {
        info!(?local_path, "Loading config from local path");
        return DemoConfig::from_file(&local_path)
            .with_context(|| format!("Failed to load config from {:?}", local_path));
    }

    info!("No config file found, using built-in defaults");
    Ok(DemoConfig::default())
}

/// Main daemon poll loop.
///
/// Each pass advances the simulated calendar by one poll interval, drains
/// the trigger latches, and feeds the comparator a reference sample
/// synthesized from the seed and the simulated elapsed time. The sample
/// only changes once per whole second, so the comparator's skip path runs
/// on sub-second poll intervals.
fn run_daemon(
    config: DemoConfig,
    signal_handler: &SignalHandler,
    seed_epoch: i64,
    max_seconds: u64,
) -> Result<()> {
    let poll_interval = config.poll_interval;
    let mut app = CalendarApp::new(SimulatedCalendar::new(), SntpTextSource::new(), config);

    app.initialize(seed_epoch)
        .context("Calendar startup sequence failed")?;
    info!("Calendar initialized, entering poll loop");

    let mut elapsed = Duration::ZERO;
    let mut alarms_seen = 0u64;

    while !signal_handler.shutdown_requested() {
        if signal_handler.take_reload_request() {
            info!("Reload signal received (config reload not yet implemented)");
        }

        std::thread::sleep(poll_interval);
        app.driver_mut().advance(poll_interval);
        elapsed += poll_interval;

        let processed = app
            .process_pending_triggers()
            .context("Trigger processing failed")?;
        if processed.alarm {
            alarms_seen += 1;
        }

        let reference_epoch = seed_epoch + i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX);
        app.compare_against_reference(&reference_epoch.to_string())
            .context("Reference comparison failed")?;

        if max_seconds > 0 && elapsed.as_secs() >= max_seconds {
            info!(simulated_secs = elapsed.as_secs(), "Maximum run time reached");
            signal_handler.request_shutdown();
        }
    }

    info!("Shutting down...");
    let final_epoch = final_epoch(&mut app).context("Final calendar read failed")?;
    app.shutdown().context("Calendar shutdown failed")?;

    info!(
        final_epoch,
        simulated_secs = elapsed.as_secs(),
        alarms = alarms_seen,
        updates = app.bridge().update_count(),
        signals = signal_handler.signal_count(),
        "Daemon shutdown complete"
    );

    Ok(())
}

/// Calendar reading for the shutdown summary, as a local-wall-clock epoch.
fn final_epoch<D: CalendarDriver, S: ReferenceTimeSource>(
    app: &mut CalendarApp<D, S>,
) -> Result<i64> {
    let reading = app.driver_mut().datetime()?;
    Ok(epoch_from_datetime(&reading)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["rtc-daemon"]);
        assert_eq!(args.seed_epoch, DEFAULT_SEED_EPOCH);
        assert_eq!(args.max_seconds, 0);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_args_with_config() {
        let args = Args::parse_from([
            "rtc-daemon",
            "-c",
            "test.toml",
            "--max-seconds",
            "30",
            "--poll-interval",
            "250ms",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("test.toml")));
        assert_eq!(args.max_seconds, 30);
        assert_eq!(args.poll_interval, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_final_epoch_tracks_simulated_time() {
        let mut app = CalendarApp::new(
            SimulatedCalendar::new(),
            SntpTextSource::new(),
            DemoConfig::default(),
        );
        app.initialize(DEFAULT_SEED_EPOCH).unwrap();
        app.driver_mut().advance(Duration::from_secs(3));

        let shift = app.config().timezone_shift_secs;
        assert_eq!(
            final_epoch(&mut app).unwrap(),
            DEFAULT_SEED_EPOCH + shift + 3
        );
    }

    #[test]
    fn test_default_config() {
        // Should succeed with defaults even without a config file
        let config = DemoConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }
}
