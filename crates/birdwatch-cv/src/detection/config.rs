//! Detection filter configuration

use birdwatch_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main detection filter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum best-class score; candidates at or below are dropped
    pub confidence_threshold: f32,
    /// IoU above which the weaker of two boxes is suppressed
    pub nms_threshold: f32,
    /// Run NMS within each label instead of across all labels
    pub class_aware_nms: bool,
    /// Side of the square detector input
    pub input_size: u32,
    /// Newline-separated class names; the built-in COCO table when unset
    pub class_names_file: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            nms_threshold: 0.3,
            class_aware_nms: false,
            input_size: 320,
            class_names_file: None,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("confidence_threshold", self.confidence_threshold)?;
        unit_interval("nms_threshold", self.nms_threshold)?;
        if self.input_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "input_size",
                expected: "a positive pixel size",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            expected: "within [0, 1]",
            value: value as f64,
        })
    }
}
