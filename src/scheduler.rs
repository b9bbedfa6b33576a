//! Sampling scheduler
//!
//! The long-lived control loop: sleep the controller's adaptive delay,
//! skip sampling while the device is idle, fork-join the tilt and distance
//! probes, score, escalate, notify, and wait out any blocking overlay
//! before the next cycle. One cooperative task owns all session state;
//! nothing here needs locking.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calibration::CalibrationStore;
use crate::config::MonitorConfig;
use crate::controller::EscalationController;
use crate::distance::DistanceProbe;
use crate::error::MonitorError;
use crate::scoring::ScoreEngine;
use crate::sensors::{
    AccelerometerSource, ActivitySignal, DistanceDetector, EventLogger, NotificationSink,
};
use crate::tilt::TiltEstimator;
use crate::types::{Baseline, PostureEvent, ReminderLevel, Rotation, SensorSample};

/// External collaborators wired into one monitoring session.
pub struct Collaborators {
    pub calibration: Arc<dyn CalibrationStore>,
    pub detector: Arc<dyn DistanceDetector>,
    pub accelerometer: Arc<dyn AccelerometerSource>,
    pub activity: Arc<dyn ActivitySignal>,
    pub notifications: Arc<dyn NotificationSink>,
    pub logger: Arc<dyn EventLogger>,
}

/// The posture monitoring loop.
pub struct MonitorScheduler {
    config: MonitorConfig,
    controller: EscalationController,
    estimator: TiltEstimator,
    probe: DistanceProbe,
    engine: ScoreEngine,
    baseline: Baseline,
    session_id: Uuid,
    collaborators: Collaborators,
}

impl MonitorScheduler {
    pub fn new(
        config: MonitorConfig,
        rotation: Rotation,
        collaborators: Collaborators,
    ) -> Result<Self, MonitorError> {
        config.validate()?;

        let baseline = collaborators.calibration.load_baseline();
        if !collaborators.calibration.is_calibrated() {
            info!("no calibration found, using default baseline");
        }

        Ok(Self {
            controller: EscalationController::new(&config),
            estimator: TiltEstimator::new(config.tilt_filter_alpha, rotation),
            probe: DistanceProbe::new(&config),
            engine: ScoreEngine::new(&config),
            baseline,
            session_id: Uuid::new_v4(),
            collaborators,
            config,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Run the monitoring loop until the shutdown channel fires (or all of
    /// its senders are dropped).
    ///
    /// Shutdown interrupts a pending sleep immediately. An in-flight cycle
    /// gets a bounded grace period to unwind; after that it is dropped,
    /// which tears down any pending probe subscriptions regardless of
    /// whether they acknowledged cancellation.
    pub async fn run(mut self, mut shutdown: mpsc::Receiver<()>) {
        info!(session = %self.session_id, "posture monitoring started");

        loop {
            let delay = self.controller.current_delay();
            debug!(delay_ms = delay.as_millis() as u64, "waiting for next cycle");
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = time::sleep(delay) => {}
            }

            if !self.collaborators.activity.is_device_active() {
                debug!("device inactive, skipping cycle");
                self.controller.reset();
                continue;
            }

            let grace = self.config.shutdown_grace();
            let cycle = self.run_cycle();
            tokio::pin!(cycle);
            tokio::select! {
                _ = shutdown.recv() => {
                    // Bounded grace for in-flight probes to unwind cleanly.
                    let _ = time::timeout(grace, &mut cycle).await;
                    break;
                }
                result = &mut cycle => {
                    if let Err(error) = result {
                        warn!(%error, "sampling cycle failed, continuing");
                    }
                }
            }
        }

        info!(session = %self.session_id, "posture monitoring stopped");
    }

    /// One sampling cycle: probe, score, escalate, notify.
    async fn run_cycle(&mut self) -> Result<(), MonitorError> {
        let tilt_timeout = self.config.tilt_read_timeout();

        // Fork-join: both probes run concurrently and both complete before
        // scoring, each bounded by its own timeout budget.
        let estimator = &mut self.estimator;
        let probe = &self.probe;
        let accelerometer = self.collaborators.accelerometer.as_ref();
        let detector = self.collaborators.detector.as_ref();
        let (tilt, distance) = tokio::join!(
            estimator.read_tilt(accelerometer, tilt_timeout),
            probe.read_distance(detector),
        );

        let sample = SensorSample { tilt, distance };
        let result = self.engine.score(&sample, &self.baseline);
        let decision = self.controller.update(result.level);
        debug!(
            score = result.score,
            level = result.level.as_str(),
            tilt = ?sample.tilt,
            distance = ?sample.distance,
            "cycle scored"
        );

        self.collaborators
            .notifications
            .present(decision.notify_level);

        let event = PostureEvent {
            timestamp: Utc::now(),
            session_id: self.session_id,
            good_posture: result.level < ReminderLevel::Strong,
            score: result.score,
            tilt: sample.tilt,
            distance: sample.distance,
            level: result.level,
        };
        if let Err(error) = self.collaborators.logger.record(&event) {
            warn!(%error, "event logger failed, ignoring");
        }

        // Do not start the next cycle while the user is still acknowledging
        // this one.
        while self.collaborators.notifications.is_blocking_overlay_visible() {
            time::sleep(self.config.overlay_poll_interval()).await;
        }

        Ok(())
    }
}
