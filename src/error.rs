//! Error types for the posture monitoring engine

use thiserror::Error;

/// Errors that can occur while monitoring.
///
/// Signal absence (no face detected, no tilt reading) is not an error and
/// is represented as `None` in [`crate::types::SensorSample`]. There is no
/// fatal error class inside the engine: every variant here is caught at the
/// scheduler's per-cycle boundary, logged, and survived. Only cancellation
/// terminates the loop, and cancellation is not an error.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Sensor resource unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Event logging failed: {0}")]
    LoggingError(String),

    #[error("Sampling cycle failed: {0}")]
    CycleError(String),
}
