//! Top-level per-frame pipeline: acquire, detect, filter, decide, actuate

use crate::camera::FrameSource;
use crate::error::FrameError;
use birdwatch_core::{dispatch, Action, ActuatorGateway, BehaviorController, Command, DispatchReport};
use birdwatch_cv::traits::ObjectDetector;
use birdwatch_cv::{DetectionCollection, DetectionFilter, DetectionStats, Frame};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What one successful frame produced
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    pub detections: DetectionCollection,
    pub detection_stats: DetectionStats,
    pub actions: Vec<Action>,
    pub report: DispatchReport,
}

/// Running counters over the lifetime of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub skipped: u64,
    pub detections: u64,
    pub alerts: u64,
    pub nudges: u64,
    pub send_failures: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames += 1;
        self.detections += outcome.detection_stats.total_detections as u64;
        for action in &outcome.actions {
            match action.command {
                Command::Buzzer => self.alerts += 1,
                Command::TurnLeft | Command::TurnRight => self.nudges += 1,
                _ => {}
            }
        }
        self.send_failures += outcome.report.failures.len() as u64;
    }
}

pub struct FrameLoop<S, D, G> {
    source: S,
    detector: D,
    filter: DetectionFilter,
    controller: BehaviorController,
    gateway: G,
    frame_interval: Duration,
    stats: LoopStats,
}

impl<S, D, G> FrameLoop<S, D, G>
where
    S: FrameSource,
    D: ObjectDetector,
    G: ActuatorGateway,
{
    pub fn new(
        source: S,
        detector: D,
        filter: DetectionFilter,
        controller: BehaviorController,
        gateway: G,
    ) -> Self {
        Self {
            source,
            detector,
            filter,
            controller,
            gateway,
            frame_interval: Duration::ZERO,
            stats: LoopStats::default(),
        }
    }

    /// Pace frames to start at most once per `interval`
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn controller(&self) -> &BehaviorController {
        &self.controller
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Process one frame as of `now`.
    ///
    /// Any error before the controller runs skips the frame and leaves the
    /// controller state untouched. Send failures are not errors here.
    pub fn tick(&mut self, now: Instant) -> Result<FrameOutcome, FrameError> {
        let encoded = self.source.fetch().map_err(FrameError::Acquisition)?;
        let frame = Frame::decode(encoded).map_err(FrameError::Decode)?;
        let rows = self.detector.detect(&frame).map_err(FrameError::Inference)?;

        let detections = self.filter.filter(&rows, frame.width(), frame.height());
        let detection_stats = detections.stats();
        debug!(
            "{} detections after filtering {:?}, best confidence {:.2}",
            detection_stats.total_detections,
            detection_stats.label_counts,
            detection_stats.max_confidence
        );

        let actions = self.controller.update(detections.as_slice(), now);
        let report = dispatch(&mut self.gateway, &actions);

        let outcome = FrameOutcome {
            detections,
            detection_stats,
            actions,
            report,
        };
        self.stats.record(&outcome);
        Ok(outcome)
    }

    /// Run until `max_frames` frames have been attempted, or forever.
    /// Per-frame errors are logged and the loop carries on.
    pub fn run(&mut self, max_frames: Option<u64>) -> LoopStats {
        let mut attempted = 0u64;

        while max_frames.map_or(true, |max| attempted < max) {
            let started = Instant::now();
            attempted += 1;

            if let Err(e) = self.tick(started) {
                warn!("[!] skipping frame: {}", e);
                self.stats.skipped += 1;
            }

            let elapsed = started.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }
        }

        info!(
            "processed {} frames ({} skipped), {} alerts, {} nudges, {} failed sends",
            self.stats.frames,
            self.stats.skipped,
            self.stats.alerts,
            self.stats.nudges,
            self.stats.send_failures
        );
        self.stats
    }
}
