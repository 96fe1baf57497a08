//! Long-lived controller state

use crate::command::ScanDirection;
use std::time::Instant;

/// Behavior mode. The watch deadline lives inside `Watching` so the mode can
/// never claim to be watching without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Alerting,
    Watching { until: Instant },
}

/// Why a deferred stop was scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopCause {
    Deterrent,
    Nudge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingStop {
    pub due: Instant,
    pub cause: StopCause,
}

/// Everything the controller remembers between frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub(crate) mode: Mode,
    pub(crate) scan_direction: ScanDirection,
    pub(crate) last_alert: Option<Instant>,
    pub(crate) pending_stop: Option<PendingStop>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            scan_direction: ScanDirection::Left,
            last_alert: None,
            pending_stop: None,
        }
    }
}

impl ControllerState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Direction the next scan nudge will take
    pub fn scan_direction(&self) -> ScanDirection {
        self.scan_direction
    }

    /// Start time of the most recent alert sequence
    pub fn last_alert(&self) -> Option<Instant> {
        self.last_alert
    }

    pub fn watch_deadline(&self) -> Option<Instant> {
        match self.mode {
            Mode::Watching { until } => Some(until),
            _ => None,
        }
    }

    /// When the deferred `Stop` is due, if one is scheduled
    pub fn stop_due(&self) -> Option<Instant> {
        self.pending_stop.map(|stop| stop.due)
    }

    /// True while forward motion from an alert is still running
    pub fn deterrent_running(&self) -> bool {
        matches!(
            self.pending_stop,
            Some(PendingStop {
                cause: StopCause::Deterrent,
                ..
            })
        )
    }
}
