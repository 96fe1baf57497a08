//! Command-line arguments

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "birdwatch", about = "Camera-driven bird deterrent robot controller")]
pub struct AppArgs {
    /// JSON configuration file; built-in defaults when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Robot host serving frames and commands (overrides the config).
    #[arg(long)]
    pub robot_host: Option<String>,
    /// Inference service URL (overrides the config).
    #[arg(long)]
    pub detector_url: Option<String>,
    /// Stop after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,
    /// Log commands instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
    /// Tracing filter used when RUST_LOG is unset.
    #[arg(long, default_value = "birdwatch=info")]
    pub log_level: String,
}

impl AppArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.robot_host {
            config.robot.host = host.clone();
        }
        if let Some(url) = &self.detector_url {
            config.detector.url = url.clone();
        }
        if self.max_frames.is_some() {
            config.frame_loop.max_frames = self.max_frames;
        }
        if self.dry_run {
            config.robot.dry_run = true;
        }
    }
}
