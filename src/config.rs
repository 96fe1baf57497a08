//! Application configuration loaded from a JSON file

use anyhow::{Context, Result};
use birdwatch_core::{ConfigError, ControllerConfig};
use birdwatch_cv::FilterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration; every section falls back to its defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub robot: RobotConfig,
    pub detector: DetectorConfig,
    pub filter: FilterConfig,
    pub behavior: ControllerConfig,
    pub frame_loop: LoopConfig,
}

/// The camera-equipped robot: frame endpoint and actuator endpoints share a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub host: String,
    pub frame_path: String,
    /// Seconds allowed for fetching one frame
    pub frame_timeout: f64,
    /// Seconds allowed for one actuator command
    pub command_timeout: f64,
    /// Log commands instead of sending them
    pub dry_run: bool,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.129".to_string(),
            frame_path: "/cam-lo.jpg".to_string(),
            frame_timeout: 5.0,
            command_timeout: 0.5,
            dry_run: false,
        }
    }
}

impl RobotConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.host.trim_end_matches('/'))
    }

    pub fn frame_url(&self) -> String {
        format!("{}{}", self.base_url(), self.frame_path)
    }
}

/// How frames are handed to the inference service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorPayload {
    /// The camera's JPEG, untouched
    Jpeg,
    /// Resized CHW float tensor, little-endian
    Blob,
}

/// Remote inference service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub url: String,
    /// Seconds allowed for one inference request
    pub timeout: f64,
    pub payload: DetectorPayload,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/detect".to_string(),
            timeout: 2.0,
            payload: DetectorPayload::Jpeg,
        }
    }
}

/// Frame loop pacing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Minimum milliseconds between frame starts; zero runs as fast as frames arrive
    pub frame_interval_ms: u64,
    /// Stop after this many frames; unset runs forever
    pub max_frames: Option<u64>,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {:?}", path.as_ref()))?;

        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path.as_ref()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.robot.host.trim().is_empty() {
            return Err(ConfigError::Empty { field: "robot.host" });
        }
        if self.detector.url.trim().is_empty() {
            return Err(ConfigError::Empty { field: "detector.url" });
        }
        positive_seconds("robot.frame_timeout", self.robot.frame_timeout)?;
        sub_second("robot.command_timeout", self.robot.command_timeout)?;
        positive_seconds("detector.timeout", self.detector.timeout)?;
        self.filter.validate()?;
        self.behavior.validate()
    }
}

fn positive_seconds(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 3600.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "positive and at most 3600 seconds",
            value,
        })
    }
}

/// Actuator sends run inline with the controller, so they must stay short
fn sub_second(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "positive and under one second",
            value,
        })
    }
}

/// Convert validated seconds into a timeout
pub fn timeout(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds)
}
