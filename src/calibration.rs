//! Calibration baseline access
//!
//! The calibration wizard itself is external; this module owns the shape of
//! what it produces — two captures turned into a [`Baseline`] — and the
//! seam through which the persisted baseline is read back.

use serde::{Deserialize, Serialize};

use crate::types::Baseline;

/// One calibration capture: the tilt and distance measured while the user
/// held a requested posture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCapture {
    /// Tilt angle during the capture (degrees)
    pub tilt: f64,
    /// Face distance ratio during the capture
    pub distance: f64,
}

/// Derive a baseline from a healthy-posture capture and a slouching capture.
pub fn derive_baseline(good: &CalibrationCapture, bad: &CalibrationCapture) -> Baseline {
    Baseline {
        good_tilt: good.tilt,
        good_distance: good.distance,
        bad_tilt: bad.tilt,
        bad_distance: bad.distance,
    }
}

/// Read side of the persisted calibration.
pub trait CalibrationStore: Send + Sync {
    /// Load the baseline, falling back to [`Baseline::default`] when the
    /// user has not calibrated.
    fn load_baseline(&self) -> Baseline;

    fn is_calibrated(&self) -> bool;
}

/// In-memory calibration store, used by the CLI and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticCalibration {
    baseline: Option<Baseline>,
}

impl StaticCalibration {
    pub fn uncalibrated() -> Self {
        Self { baseline: None }
    }

    pub fn with_baseline(baseline: Baseline) -> Self {
        Self {
            baseline: Some(baseline),
        }
    }
}

impl CalibrationStore for StaticCalibration {
    fn load_baseline(&self) -> Baseline {
        self.baseline.unwrap_or_default()
    }

    fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_baseline_from_captures() {
        let good = CalibrationCapture {
            tilt: 68.0,
            distance: 0.75,
        };
        let bad = CalibrationCapture {
            tilt: 28.0,
            distance: 0.45,
        };

        let baseline = derive_baseline(&good, &bad);
        assert_eq!(baseline.good_tilt, 68.0);
        assert_eq!(baseline.bad_distance, 0.45);
    }

    #[test]
    fn test_uncalibrated_store_falls_back_to_defaults() {
        let store = StaticCalibration::uncalibrated();
        assert!(!store.is_calibrated());
        assert_eq!(store.load_baseline(), Baseline::default());
    }

    #[test]
    fn test_calibrated_store_returns_stored_baseline() {
        let baseline = Baseline {
            good_tilt: 65.0,
            good_distance: 0.9,
            bad_tilt: 25.0,
            bad_distance: 0.5,
        };
        let store = StaticCalibration::with_baseline(baseline);
        assert!(store.is_calibrated());
        assert_eq!(store.load_baseline(), baseline);
    }
}
