//! Configuration structures for the calendar demo runtime.
//!
//! Supports TOML deserialization with sensible defaults. The original
//! vendor demo selected its branches with compile-time flags; here every
//! demo branch is a runtime toggle so all of them stay reachable and
//! testable without recompilation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Fixed shift applied to reference time before comparison and to the
    /// seed epoch before it is written to the calendar, in seconds.
    pub timezone_shift_secs: i64,

    /// Poll loop interval.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Calendar clock source.
    pub clock_source: ClockSource,

    /// Demo feature toggles.
    pub demos: DemoFeatures,

    /// Alarm demo configuration.
    pub alarm: AlarmConfig,

    /// Trigger period configuration.
    pub triggers: TriggerConfig,

    /// Clock calibration configuration.
    pub calibration: CalibrationConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            // UTC+8, matching the vendor demo's wall clock
            timezone_shift_secs: 28_800,
            poll_interval: Duration::from_secs(1),
            clock_source: ClockSource::default(),
            demos: DemoFeatures::default(),
            alarm: AlarmConfig::default(),
            triggers: TriggerConfig::default(),
            calibration: CalibrationConfig::default(),
        }
    }
}

/// Clock source feeding the calendar peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClockSource {
    /// Internal 32 kHz RC oscillator.
    Rc32k,
    /// External 32 kHz crystal.
    #[default]
    Xtal32k,
}

/// Which demo branches to run at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoFeatures {
    /// Set an alarm and report when it fires.
    pub alarm: bool,
    /// Run RC/RO clock calibration at init.
    pub calibration: bool,
    /// Register the one-second trigger.
    pub second_trigger: bool,
    /// Register the one-millisecond trigger.
    pub millisecond_trigger: bool,
    /// Log a Unix/NTP epoch conversion round trip at init.
    pub time_conversion: bool,
}

impl Default for DemoFeatures {
    fn default() -> Self {
        Self {
            alarm: true,
            calibration: false,
            second_trigger: true,
            millisecond_trigger: true,
            time_conversion: true,
        }
    }
}

/// Alarm demo configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Seconds after the seed time at which the alarm fires.
    pub offset_secs: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self { offset_secs: 5 }
    }
}

/// Trigger period configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Second-trigger occurrences per latch set.
    pub second_period: u32,
    /// Millisecond-trigger occurrences per latch set.
    pub millisecond_period: u32,
    /// Second latches per formatted time report in the poll loop.
    pub report_period: u32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            second_period: 1,
            millisecond_period: 1000,
            report_period: 5,
        }
    }
}

/// RC/RO clock calibration configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Enable RC oscillator calibration.
    pub rc_enable: bool,
    /// Re-run RC calibration periodically.
    pub rc_periodic: bool,
    /// RC calibration trigger interval.
    #[serde(with = "humantime_serde")]
    pub rc_interval: Duration,
    /// Enable RO oscillator calibration.
    pub ro_enable: bool,
    /// Re-run RO calibration periodically.
    pub ro_periodic: bool,
    /// RO calibration trigger interval.
    #[serde(with = "humantime_serde")]
    pub ro_interval: Duration,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            rc_enable: true,
            rc_periodic: true,
            rc_interval: Duration::from_secs(30),
            ro_enable: true,
            ro_periodic: true,
            ro_interval: Duration::from_secs(1),
        }
    }
}

impl DemoConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Duration` using humantime format.
mod humantime_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = humantime::format_duration(*duration).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
