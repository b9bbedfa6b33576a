//! Distance probing
//!
//! Wraps the external single-shot face-distance detector with bounded
//! retries and a per-attempt deadline. Face detection is bursty (head
//! movement, occlusion), so a single missed frame must not be conflated
//! with "user not present" — the probe retries a few times before giving
//! up on the cycle.

use std::time::Duration;

use tokio::time;
use tracing::debug;

use crate::config::MonitorConfig;
use crate::sensors::DistanceDetector;

/// Retry/timeout policy around [`DistanceDetector::detect_once`].
#[derive(Debug, Clone)]
pub struct DistanceProbe {
    max_attempts: u32,
    attempt_timeout: Duration,
    retry_delay: Duration,
}

impl DistanceProbe {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            max_attempts: config.max_distance_attempts,
            attempt_timeout: config.distance_attempt_timeout(),
            retry_delay: config.distance_retry_delay(),
        }
    }

    /// Read the face distance once, retrying failed attempts.
    ///
    /// Each attempt races the detector's resolution against the attempt
    /// deadline; whichever finishes first wins, and dropping the pending
    /// receiver abandons the attempt so the detector can release its
    /// capture resource. Returns `None` once every attempt has failed.
    pub async fn read_distance(&self, detector: &dyn DistanceDetector) -> Option<f64> {
        for attempt in 1..=self.max_attempts {
            let pending = detector.detect_once();
            match time::timeout(self.attempt_timeout, pending).await {
                Ok(Ok(distance)) => {
                    debug!(attempt, distance, "face distance detected");
                    return Some(distance);
                }
                Ok(Err(_)) => {
                    debug!(attempt, "detector abandoned the attempt");
                }
                Err(_) => {
                    debug!(attempt, "detection deadline elapsed");
                }
            }

            if attempt < self.max_attempts {
                time::sleep(self.retry_delay).await;
            }
        }

        debug!(
            attempts = self.max_attempts,
            "no face detected after all attempts"
        );
        None
    }
}
