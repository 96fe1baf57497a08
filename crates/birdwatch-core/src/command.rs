//! Actuator commands understood by the robot

use serde::{Deserialize, Serialize};
use std::fmt;

/// One-way command sent to the robot's actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Buzzer,
    Flash,
    MoveForward,
    Stop,
    TurnLeft,
    TurnRight,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Buzzer,
        Command::Flash,
        Command::MoveForward,
        Command::Stop,
        Command::TurnLeft,
        Command::TurnRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Buzzer => "Buzzer",
            Command::Flash => "Flash",
            Command::MoveForward => "MoveForward",
            Command::Stop => "Stop",
            Command::TurnLeft => "TurnLeft",
            Command::TurnRight => "TurnRight",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the next scan nudge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanDirection {
    #[default]
    Left,
    Right,
}

impl ScanDirection {
    pub fn opposite(self) -> Self {
        match self {
            ScanDirection::Left => ScanDirection::Right,
            ScanDirection::Right => ScanDirection::Left,
        }
    }

    /// Turn command that nudges the robot this way
    pub fn command(self) -> Command {
        match self {
            ScanDirection::Left => Command::TurnLeft,
            ScanDirection::Right => Command::TurnRight,
        }
    }
}
