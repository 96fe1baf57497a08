//! Detection-driven behavior state machine

use super::config::{ConfigError, ControllerConfig, Timings};
use super::state::{ControllerState, Mode, PendingStop, StopCause};
use crate::command::Command;
use crate::detection::Detection;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

/// Why the controller issued a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reason {
    /// The target class is in frame and the cooldown has elapsed
    TargetSighted,
    /// Forward motion ran for the configured deterrent duration
    DeterrentComplete,
    /// Nothing in frame and the watch window is over
    ScanNudge,
    /// A scan turn ran for the configured nudge duration
    NudgeComplete,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::TargetSighted => "target sighted",
            Reason::DeterrentComplete => "deterrent complete",
            Reason::ScanNudge => "scan nudge",
            Reason::NudgeComplete => "nudge complete",
        };
        f.write_str(text)
    }
}

/// A command together with the reason it was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    pub command: Command,
    pub reason: Reason,
}

impl Action {
    pub fn new(command: Command, reason: Reason) -> Self {
        Self { command, reason }
    }
}

/// Turns filtered per-frame detections into actuator commands.
///
/// Timing windows (deterrent run, nudge run, watch settle) are deadlines compared
/// against the `now` passed to each [`BehaviorController::update`]; nothing here
/// ever sleeps.
#[derive(Debug, Clone)]
pub struct BehaviorController {
    state: ControllerState,
    timings: Timings,
    target_label: String,
}

impl BehaviorController {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        let timings = config.timings()?;
        Ok(Self {
            state: ControllerState::default(),
            timings,
            target_label: config.target_label,
        })
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Advance the state machine by one frame.
    ///
    /// Must be called once per frame with a non-decreasing `now`.
    pub fn update(&mut self, detections: &[Detection], now: Instant) -> Vec<Action> {
        let mut actions = Vec::new();

        self.release_due_stop(now, &mut actions);

        if detections.iter().any(|d| d.is(&self.target_label)) {
            self.on_target(now, &mut actions);
        } else {
            self.on_clear(now, &mut actions);
        }

        actions
    }

    fn on_target(&mut self, now: Instant, actions: &mut Vec<Action>) {
        self.state.mode = Mode::Alerting;

        if !self.cooldown_elapsed(now) {
            debug!("{} still in frame, alert suppressed by cooldown", self.target_label);
            return;
        }

        info!("{} detected, starting deterrent", self.target_label);
        actions.extend(
            [Command::Buzzer, Command::Flash, Command::MoveForward]
                .into_iter()
                .map(|command| Action::new(command, Reason::TargetSighted)),
        );
        self.state.last_alert = Some(now);
        self.schedule_stop(now, StopCause::Deterrent, actions);
    }

    fn on_clear(&mut self, now: Instant, actions: &mut Vec<Action>) {
        if let Mode::Watching { until } = self.state.mode {
            if now < until {
                return;
            }
            debug!("watch window elapsed");
            self.state.mode = Mode::Idle;
        }

        // let forward motion finish before turning away
        if self.state.deterrent_running() {
            return;
        }

        self.nudge(now, actions);
    }

    fn nudge(&mut self, now: Instant, actions: &mut Vec<Action>) {
        let direction = self.state.scan_direction;
        info!("no {} in view, scanning {:?}", self.target_label, direction);

        actions.push(Action::new(direction.command(), Reason::ScanNudge));
        self.schedule_stop(now, StopCause::Nudge, actions);

        self.state.scan_direction = direction.opposite();
        self.state.mode = Mode::Watching {
            until: now + self.timings.watch_time,
        };
    }

    fn schedule_stop(&mut self, now: Instant, cause: StopCause, actions: &mut Vec<Action>) {
        let run_for = match cause {
            StopCause::Deterrent => self.timings.deterrent_duration,
            StopCause::Nudge => self.timings.nudge_duration,
        };
        self.state.pending_stop = Some(PendingStop {
            due: now + run_for,
            cause,
        });
        self.release_due_stop(now, actions);
    }

    fn release_due_stop(&mut self, now: Instant, actions: &mut Vec<Action>) {
        let Some(stop) = self.state.pending_stop else {
            return;
        };
        if now < stop.due {
            return;
        }

        let reason = match stop.cause {
            StopCause::Deterrent => Reason::DeterrentComplete,
            StopCause::Nudge => Reason::NudgeComplete,
        };
        actions.push(Action::new(Command::Stop, reason));
        self.state.pending_stop = None;
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.state.last_alert {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.timings.buzzer_cooldown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ScanDirection;
    use crate::detection::BBox;
    use std::time::Duration;

    fn bird() -> Vec<Detection> {
        vec![Detection::new("bird", 0.9, BBox::new(10, 10, 40, 40))]
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn commands(actions: &[Action]) -> Vec<Command> {
        actions.iter().map(|a| a.command).collect()
    }

    fn controller() -> BehaviorController {
        BehaviorController::new(ControllerConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.state().mode(), Mode::Idle);
        assert_eq!(c.state().scan_direction(), ScanDirection::Left);
        assert_eq!(c.state().last_alert(), None);
        assert_eq!(c.state().watch_deadline(), None);
    }

    #[test]
    fn test_first_sighting_starts_alert_sequence() {
        let mut c = controller();
        let t = Instant::now();

        let actions = c.update(&bird(), t);
        assert_eq!(
            commands(&actions),
            vec![Command::Buzzer, Command::Flash, Command::MoveForward]
        );
        assert!(actions.iter().all(|a| a.reason == Reason::TargetSighted));
        assert_eq!(c.state().last_alert(), Some(t));
        assert_eq!(c.state().mode(), Mode::Alerting);
        assert_eq!(c.state().stop_due(), Some(t + secs(5.0)));
    }

    #[test]
    fn test_cooldown_suppresses_repeat_alert() {
        let mut c = controller();
        let t = Instant::now();
        c.update(&bird(), t);

        assert!(c.update(&bird(), t + secs(1.0)).is_empty());
        assert!(c.update(&bird(), t + secs(3.0)).is_empty());
        assert_eq!(c.state().mode(), Mode::Alerting);
        assert_eq!(c.state().last_alert(), Some(t));
    }

    #[test]
    fn test_alert_repeats_after_cooldown() {
        let mut c = controller();
        let t = Instant::now();
        c.update(&bird(), t);

        let later = t + secs(3.1);
        let actions = c.update(&bird(), later);
        assert_eq!(
            commands(&actions),
            vec![Command::Buzzer, Command::Flash, Command::MoveForward]
        );
        assert_eq!(c.state().last_alert(), Some(later));
        // the deferred stop is pushed out by the new sequence
        assert_eq!(c.state().stop_due(), Some(later + secs(5.0)));
    }

    #[test]
    fn test_deterrent_stop_fires_once_deadline_passes() {
        let config = ControllerConfig {
            buzzer_cooldown: 10.0,
            ..Default::default()
        };
        let mut c = BehaviorController::new(config).unwrap();
        let t = Instant::now();
        c.update(&bird(), t);

        assert!(c.update(&bird(), t + secs(2.0)).is_empty());
        let actions = c.update(&bird(), t + secs(5.0));
        assert_eq!(
            actions,
            vec![Action::new(Command::Stop, Reason::DeterrentComplete)]
        );
        assert_eq!(c.state().stop_due(), None);
    }

    #[test]
    fn test_scanning_waits_for_deterrent_to_finish() {
        let mut c = controller();
        let t = Instant::now();
        c.update(&bird(), t);

        assert!(c.update(&[], t + secs(1.0)).is_empty());
        assert_eq!(c.state().mode(), Mode::Alerting);

        let actions = c.update(&[], t + secs(5.5));
        assert_eq!(
            commands(&actions),
            vec![Command::Stop, Command::TurnLeft, Command::Stop]
        );
        assert_eq!(actions[0].reason, Reason::DeterrentComplete);
        assert_eq!(actions[1].reason, Reason::ScanNudge);
        assert!(matches!(c.state().mode(), Mode::Watching { .. }));
    }

    #[test]
    fn test_idle_nudge_then_watch() {
        let mut c = controller();
        let t = Instant::now();

        let actions = c.update(&[], t);
        assert_eq!(commands(&actions), vec![Command::TurnLeft, Command::Stop]);
        assert_eq!(c.state().scan_direction(), ScanDirection::Right);
        assert_eq!(c.state().mode(), Mode::Watching { until: t + secs(5.0) });
        assert_eq!(c.state().watch_deadline(), Some(t + secs(5.0)));
    }

    #[test]
    fn test_watch_window_paces_nudges() {
        let mut c = controller();
        let t = Instant::now();
        c.update(&[], t);

        assert!(c.update(&[], t + secs(4.9)).is_empty());
        let actions = c.update(&[], t + secs(5.1));
        assert_eq!(commands(&actions), vec![Command::TurnRight, Command::Stop]);
        assert_eq!(c.state().scan_direction(), ScanDirection::Left);
    }

    #[test]
    fn test_sighting_cancels_watch() {
        let mut c = controller();
        let t = Instant::now();
        c.update(&[], t);

        c.update(&bird(), t + secs(1.0));
        assert_eq!(c.state().mode(), Mode::Alerting);
        assert_eq!(c.state().watch_deadline(), None);
    }

    #[test]
    fn test_other_labels_do_not_trigger() {
        let mut c = controller();
        let t = Instant::now();
        let cat = vec![Detection::new("cat", 0.99, BBox::new(0, 0, 5, 5))];

        let actions = c.update(&cat, t);
        assert_eq!(commands(&actions), vec![Command::TurnLeft, Command::Stop]);
        assert_eq!(c.state().last_alert(), None);
    }

    #[test]
    fn test_timed_nudge_defers_stop() {
        let mut c = BehaviorController::new(ControllerConfig::with_timed_nudges()).unwrap();
        let t = Instant::now();

        let actions = c.update(&[], t);
        assert_eq!(commands(&actions), vec![Command::TurnLeft]);
        assert!(!c.state().deterrent_running());

        assert!(c.update(&[], t + secs(0.1)).is_empty());
        let actions = c.update(&[], t + secs(0.3));
        assert_eq!(
            actions,
            vec![Action::new(Command::Stop, Reason::NudgeComplete)]
        );
    }

    #[test]
    fn test_zero_deterrent_duration_stops_immediately() {
        let config = ControllerConfig {
            deterrent_duration: 0.0,
            ..Default::default()
        };
        let mut c = BehaviorController::new(config).unwrap();

        let actions = c.update(&bird(), Instant::now());
        assert_eq!(
            commands(&actions),
            vec![
                Command::Buzzer,
                Command::Flash,
                Command::MoveForward,
                Command::Stop
            ]
        );
    }

    #[test]
    fn test_custom_target_label() {
        let config = ControllerConfig {
            target_label: "cat".to_string(),
            ..Default::default()
        };
        let mut c = BehaviorController::new(config).unwrap();
        assert_eq!(c.target_label(), "cat");

        let cat = vec![Detection::new("cat", 0.7, BBox::new(0, 0, 5, 5))];
        let actions = c.update(&cat, Instant::now());
        assert_eq!(actions[0].command, Command::Buzzer);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ControllerConfig {
            watch_time: -2.0,
            ..Default::default()
        };
        assert!(BehaviorController::new(config).is_err());
    }
}
