//! Tilt estimation
//!
//! Filters raw 3-axis gravity samples into a stable tilt angle in degrees.
//! An exponentially-weighted moving average smooths sensor noise; the angle
//! is taken between the device plane and gravity, with the primary axis
//! chosen by the current screen rotation.

use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::sensors::AccelerometerSource;
use crate::types::{AccelSample, Rotation};

/// Gravity-vector low-pass filter and rotation-aware angle computation.
///
/// Filter state persists across reads, so successive cycles refine the
/// same gravity estimate instead of starting over.
#[derive(Debug, Clone)]
pub struct TiltEstimator {
    alpha: f64,
    rotation: Rotation,
    filtered: Option<[f64; 3]>,
}

impl TiltEstimator {
    pub fn new(alpha: f64, rotation: Rotation) -> Self {
        Self {
            alpha,
            rotation,
            filtered: None,
        }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Fold one raw sample into the gravity filter.
    ///
    /// The first reading seeds the filter directly; starting from zero
    /// would bias early angles toward a flat device.
    pub fn ingest(&mut self, sample: AccelSample) {
        match &mut self.filtered {
            None => self.filtered = Some([sample.x, sample.y, sample.z]),
            Some(gravity) => {
                gravity[0] = self.alpha * gravity[0] + (1.0 - self.alpha) * sample.x;
                gravity[1] = self.alpha * gravity[1] + (1.0 - self.alpha) * sample.y;
                gravity[2] = self.alpha * gravity[2] + (1.0 - self.alpha) * sample.z;
            }
        }
    }

    /// Tilt angle from the current filtered gravity vector, if any sample
    /// has been ingested yet.
    pub fn angle(&self) -> Option<f64> {
        self.filtered
            .map(|gravity| tilt_angle(&gravity, self.rotation))
    }

    /// Perform one tilt read against a live accelerometer stream.
    ///
    /// Subscribes, resolves on the first sample produced after the read
    /// begins, and returns `None` if nothing arrives within `timeout` — a
    /// dead sensor stream must not stall the sampling cycle. The
    /// subscription is dropped on every exit path, unregistering the
    /// listener.
    pub async fn read_tilt(
        &mut self,
        source: &dyn AccelerometerSource,
        timeout: Duration,
    ) -> Option<f64> {
        let mut rx = source.subscribe();
        match time::timeout(timeout, rx.recv()).await {
            Ok(Some(sample)) => {
                self.ingest(sample);
                self.angle()
            }
            Ok(None) => {
                debug!("accelerometer stream closed before first sample");
                None
            }
            Err(_) => {
                debug!(?timeout, "no accelerometer sample before deadline");
                None
            }
        }
    }
}

/// Angle between the device plane and gravity, in degrees.
///
/// Portrait rotations use the y axis as primary (pitch), landscape
/// rotations use x (roll); the inverted rotations flip the sign before the
/// absolute value is taken.
fn tilt_angle(gravity: &[f64; 3], rotation: Rotation) -> f64 {
    let norm =
        (gravity[0] * gravity[0] + gravity[1] * gravity[1] + gravity[2] * gravity[2]).sqrt();
    if norm < 1e-3 {
        return 0.0;
    }

    let (primary, second, third) = match rotation {
        Rotation::Deg0 => (gravity[1], gravity[0], gravity[2]),
        Rotation::Deg90 => (gravity[0], gravity[1], gravity[2]),
        Rotation::Deg180 => (-gravity[1], gravity[0], gravity[2]),
        Rotation::Deg270 => (-gravity[0], gravity[1], gravity[2]),
    };

    primary
        .atan2((second * second + third * third).sqrt())
        .to_degrees()
        .abs()
}
