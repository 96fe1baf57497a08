//! Birdwatch: watches a robot's camera feed for birds and drives its deterrents.
//!
//! The decision logic lives in `birdwatch-core` and the detection filter in
//! `birdwatch-cv`; this crate wires them to the camera, the inference service
//! and the robot's actuators.

pub mod actuator;
pub mod camera;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod frame_loop;

pub use config::AppConfig;
pub use error::FrameError;
pub use frame_loop::{FrameLoop, FrameOutcome, LoopStats};
