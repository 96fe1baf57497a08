//! Actuator gateway contract
//!
//! A gateway delivers one command per call, at most once, within a short timeout.
//! Delivery is best-effort: failures are reported to the caller and logged, never
//! retried, and never fed back into the controller state.

use crate::command::Command;
use crate::controller::Action;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Failure to deliver a single command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("{command} timed out after {after:?}")]
    Timeout { command: Command, after: Duration },
    #[error("{command} rejected with status {status}")]
    Rejected { command: Command, status: u16 },
    #[error("{command} could not be delivered: {message}")]
    Transport { command: Command, message: String },
}

impl GatewayError {
    pub fn command(&self) -> Command {
        match self {
            GatewayError::Timeout { command, .. }
            | GatewayError::Rejected { command, .. }
            | GatewayError::Transport { command, .. } => *command,
        }
    }
}

/// Sends commands to the robot
pub trait ActuatorGateway {
    /// Attempt delivery once; must return within the gateway's timeout
    fn send(&mut self, command: Command) -> Result<(), GatewayError>;
}

impl<G: ActuatorGateway + ?Sized> ActuatorGateway for Box<G> {
    fn send(&mut self, command: Command) -> Result<(), GatewayError> {
        (**self).send(command)
    }
}

impl<G: ActuatorGateway + ?Sized> ActuatorGateway for &mut G {
    fn send(&mut self, command: Command) -> Result<(), GatewayError> {
        (**self).send(command)
    }
}

/// Outcome of dispatching one frame's actions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failures: Vec<GatewayError>,
}

impl DispatchReport {
    pub fn all_sent(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Send every action in order. A failed send is logged and skipped; the rest
/// still go out.
pub fn dispatch<G: ActuatorGateway + ?Sized>(gateway: &mut G, actions: &[Action]) -> DispatchReport {
    let mut report = DispatchReport::default();

    for action in actions {
        match gateway.send(action.command) {
            Ok(()) => {
                info!("[ok] {} ({})", action.command, action.reason);
                report.sent += 1;
            }
            Err(e) => {
                warn!("[failed] {} ({}): {}", action.command, action.reason, e);
                report.failures.push(e);
            }
        }
    }

    report
}
