//! Behavior controller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Longest duration accepted for any timing parameter
pub const MAX_SECONDS: f64 = 86_400.0;

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Timing and targeting parameters for the behavior state machine.
///
/// All durations are expressed in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Class label that triggers the deterrent
    pub target_label: String,
    /// Minimum gap between two alert sequence starts
    pub buzzer_cooldown: f64,
    /// Settle period after a scan nudge before the next one
    pub watch_time: f64,
    /// How long forward motion runs before the automatic stop
    pub deterrent_duration: f64,
    /// How long a scan turn runs before its stop; zero stops in the same frame
    pub nudge_duration: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            target_label: "bird".to_string(),
            buzzer_cooldown: 3.0,
            watch_time: 5.0,
            deterrent_duration: 5.0,
            nudge_duration: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Scan turns that run for 0.3s before the stop, for drivetrains that need it
    pub fn with_timed_nudges() -> Self {
        Self {
            nudge_duration: 0.3,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_label.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "target_label",
            });
        }
        non_negative("buzzer_cooldown", self.buzzer_cooldown)?;
        non_negative("deterrent_duration", self.deterrent_duration)?;
        non_negative("nudge_duration", self.nudge_duration)?;
        // a zero watch window would let Watching expire at the instant it is entered
        if !(self.watch_time > 0.0 && self.watch_time <= MAX_SECONDS) {
            return Err(ConfigError::OutOfRange {
                field: "watch_time",
                expected: "positive and at most 86400 seconds",
                value: self.watch_time,
            });
        }
        Ok(())
    }

    pub(crate) fn timings(&self) -> Result<Timings, ConfigError> {
        self.validate()?;
        Ok(Timings {
            buzzer_cooldown: Duration::from_secs_f64(self.buzzer_cooldown),
            watch_time: Duration::from_secs_f64(self.watch_time),
            deterrent_duration: Duration::from_secs_f64(self.deterrent_duration),
            nudge_duration: Duration::from_secs_f64(self.nudge_duration),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=MAX_SECONDS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "between 0 and 86400 seconds",
            value,
        })
    }
}

/// Validated durations held by the controller
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timings {
    pub buzzer_cooldown: Duration,
    pub watch_time: Duration,
    pub deterrent_duration: Duration,
    pub nudge_duration: Duration,
}
