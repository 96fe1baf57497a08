//! Behavior controller: per-frame decisions over long-lived state

pub mod behavior;
pub mod config;
pub mod state;

pub use behavior::{Action, BehaviorController, Reason};
pub use config::{ConfigError, ControllerConfig};
pub use state::{ControllerState, Mode};
