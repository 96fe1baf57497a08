use anyhow::Result;
use birdwatch::actuator::{DryRunGateway, HttpGateway};
use birdwatch::camera::HttpCamera;
use birdwatch::cli::AppArgs;
use birdwatch::config::{timeout, AppConfig};
use birdwatch::detector::HttpDetector;
use birdwatch::FrameLoop;
use birdwatch_core::{ActuatorGateway, BehaviorController};
use birdwatch_cv::DetectionFilter;
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = AppArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("Birdwatch starting");

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    info!("Configuration loaded, robot at {}", config.robot.base_url());

    let camera = HttpCamera::new(config.robot.frame_url(), timeout(config.robot.frame_timeout))?;
    let detector = HttpDetector::new(&config.detector, config.filter.input_size)?;
    let filter = DetectionFilter::new(config.filter.clone())?;
    let controller = BehaviorController::new(config.behavior.clone())?;

    let gateway: Box<dyn ActuatorGateway> = if config.robot.dry_run {
        info!("Dry run: commands will only be logged");
        Box::new(DryRunGateway::default())
    } else {
        Box::new(HttpGateway::new(
            config.robot.base_url(),
            timeout(config.robot.command_timeout),
        )?)
    };

    let mut frame_loop = FrameLoop::new(camera, detector, filter, controller, gateway)
        .with_frame_interval(Duration::from_millis(config.frame_loop.frame_interval_ms));

    frame_loop.run(config.frame_loop.max_frames);
    Ok(())
}
