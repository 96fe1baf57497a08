//! HTTP actuator gateway for the robot's command endpoints

use anyhow::{Context, Result};
use birdwatch_core::{ActuatorGateway, Command, GatewayError};
use std::time::Duration;
use tracing::info;

/// Path and query the robot firmware expects for each command
pub fn endpoint(command: Command) -> &'static str {
    match command {
        Command::Buzzer => "/buzzer?action=on",
        Command::Flash => "/flash",
        Command::MoveForward => "/move?action=forward",
        Command::TurnLeft => "/move?action=left",
        Command::TurnRight => "/move?action=right",
        Command::Stop => "/move?action=stop",
    }
}

/// Sends each command as a single GET, bounded by the client timeout
pub struct HttpGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build actuator HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn url_for(&self, command: Command) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint(command))
    }
}

impl ActuatorGateway for HttpGateway {
    fn send(&mut self, command: Command) -> Result<(), GatewayError> {
        let response = self
            .client
            .get(self.url_for(command))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        command,
                        after: self.timeout,
                    }
                } else {
                    GatewayError::Transport {
                        command,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                command,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Logs commands without touching the network
#[derive(Debug, Default)]
pub struct DryRunGateway {
    sent: u64,
}

impl DryRunGateway {
    /// Number of commands logged so far
    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl ActuatorGateway for DryRunGateway {
    fn send(&mut self, command: Command) -> Result<(), GatewayError> {
        info!("(dry run) {} -> {}", command, endpoint(command));
        self.sent += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() -> Result<()> {
        let gateway = HttpGateway::new("http://192.168.1.129/", Duration::from_millis(500))?;
        assert_eq!(
            gateway.url_for(Command::Buzzer),
            "http://192.168.1.129/buzzer?action=on"
        );
        assert_eq!(
            gateway.url_for(Command::TurnRight),
            "http://192.168.1.129/move?action=right"
        );
        Ok(())
    }

    #[test]
    fn test_every_command_has_an_endpoint() {
        for command in Command::ALL {
            assert!(endpoint(command).starts_with('/'));
        }
    }

    #[test]
    fn test_unreachable_robot_reports_error() -> Result<()> {
        let mut gateway = HttpGateway::new("http://127.0.0.1:1", Duration::from_millis(200))?;
        let err = gateway.send(Command::Stop).unwrap_err();
        assert_eq!(err.command(), Command::Stop);
        Ok(())
    }

    #[test]
    fn test_dry_run_counts_without_buffering() {
        let mut gateway = DryRunGateway::default();
        assert!(gateway.send(Command::Flash).is_ok());
        assert!(gateway.send(Command::Stop).is_ok());
        assert_eq!(gateway.sent(), 2);
    }
}
