//! Uprite - On-device adaptive posture-monitoring engine
//!
//! Uprite estimates a user's sitting posture from two noisy, intermittently
//! available signals — device tilt and face-to-screen distance — and drives
//! escalating feedback when posture degrades. The engine is the control
//! loop only: sensors, face detection, notification rendering, and storage
//! stay behind the collaborator traits in [`sensors`] and [`calibration`].
//!
//! ## Modules
//!
//! - **Scheduler**: the sampling loop with adaptive cadence and shutdown
//! - **Tilt Estimator**: EWMA gravity filtering into a tilt angle
//! - **Distance Probe**: retry/timeout wrapper around the face detector
//! - **Scoring Engine**: personalized 0-100 scoring over a baseline
//! - **Escalation Controller**: congestion-control-style cadence and
//!   notification escalation

pub mod calibration;
pub mod config;
pub mod controller;
pub mod distance;
pub mod error;
pub mod scheduler;
pub mod scoring;
pub mod sensors;
pub mod tilt;
pub mod types;

pub use calibration::{derive_baseline, CalibrationCapture, CalibrationStore, StaticCalibration};
pub use config::MonitorConfig;
pub use controller::{notify_level_for_streak, Decision, EscalationController};
pub use distance::DistanceProbe;
pub use error::MonitorError;
pub use scheduler::{Collaborators, MonitorScheduler};
pub use scoring::{feedback_message, level_for_score, ScoreEngine};
pub use sensors::{
    AccelerometerSource, ActivitySignal, DistanceDetector, EventLogger, NotificationSink,
    NullLogger,
};
pub use tilt::TiltEstimator;
pub use types::{
    AccelSample, Baseline, PostureEvent, ReminderLevel, Rotation, ScoreResult, SensorSample,
};

/// Engine version embedded in CLI output
pub const UPRITE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for logged events and CLI output
pub const PRODUCER_NAME: &str = "uprite";
