//! External collaborator seams
//!
//! The engine never touches a camera, a sensor HAL, or a notification
//! surface directly. Each collaborator is a trait here; platform crates (or
//! test mocks) supply the implementations.

use tokio::sync::{mpsc, oneshot};

use crate::error::MonitorError;
use crate::types::{AccelSample, PostureEvent, ReminderLevel};

/// Single-shot face-distance detector.
pub trait DistanceDetector: Send + Sync {
    /// Begin one detection attempt.
    ///
    /// The returned receiver resolves with a face distance ratio, or never
    /// resolves at all (no face in view) — callers must pair it with their
    /// own deadline. Dropping the receiver abandons the attempt and lets
    /// the implementation release the capture resource.
    fn detect_once(&self) -> oneshot::Receiver<f64>;
}

/// Push-based 3-axis accelerometer stream.
pub trait AccelerometerSource: Send + Sync {
    /// Subscribe to the live sample stream.
    ///
    /// Samples arrive at the platform cadence until the receiver is
    /// dropped, which unregisters the listener.
    fn subscribe(&self) -> mpsc::Receiver<AccelSample>;
}

/// Whether the device is actively in use (screen on, not idle).
pub trait ActivitySignal: Send + Sync {
    fn is_device_active(&self) -> bool;
}

/// Presentation boundary for reminders.
pub trait NotificationSink: Send + Sync {
    /// Render the given escalation level. Fire-and-forget.
    fn present(&self, level: ReminderLevel);

    /// Whether a blocking overlay from an earlier reminder is still on
    /// screen. The scheduler will not start a new cycle while this holds.
    fn is_blocking_overlay_visible(&self) -> bool;
}

/// Best-effort observation logger.
pub trait EventLogger: Send + Sync {
    fn record(&self, event: &PostureEvent) -> Result<(), MonitorError>;
}

/// Logger that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl EventLogger for NullLogger {
    fn record(&self, _event: &PostureEvent) -> Result<(), MonitorError> {
        Ok(())
    }
}
