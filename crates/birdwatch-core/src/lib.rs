//! Birdwatch core
//!
//! Domain types and the behavior state machine that turns per-frame detections
//! into actuator commands for a camera-equipped deterrent robot.

pub mod command;
pub mod controller;
pub mod detection;
pub mod gateway;

// Re-export commonly used types
pub use command::{Command, ScanDirection};
pub use controller::{
    Action, BehaviorController, ConfigError, ControllerConfig, ControllerState, Mode, Reason,
};
pub use detection::{BBox, Detection};
pub use gateway::{dispatch, ActuatorGateway, DispatchReport, GatewayError};
