//! Personalized posture scoring
//!
//! Converts a (tilt, distance) pair — each possibly absent — plus the
//! personalized baseline into a 0–100 score and a reminder level. Both
//! zone functions are five-zone piecewise-linear curves anchored on the
//! baseline: excellent / good / acceptable / warning / critical.
//!
//! Missing data is scored, not rejected: with no readings at all the score
//! is a neutral 50, and a missing face with a known tilt falls back to a
//! stricter tilt-only scale (the face usually leaves the camera's view
//! because the user is looking down — itself a posture signal).

use crate::config::MonitorConfig;
use crate::types::{Baseline, ReminderLevel, ScoreResult, SensorSample};

/// Margin beyond the good-posture anchor that counts as the excellent zone.
const EXCELLENT_MARGIN: f64 = 0.15;

/// Neutral score reported when neither sensor produced a reading.
const NEUTRAL_SCORE: u8 = 50;

/// Weighted scoring over the personalized baseline.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    tilt_weight: f64,
    distance_weight: f64,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl ScoreEngine {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            tilt_weight: config.tilt_weight,
            distance_weight: config.distance_weight,
        }
    }

    /// Score one sensor sample against the baseline.
    pub fn score(&self, sample: &SensorSample, baseline: &Baseline) -> ScoreResult {
        let score = match (sample.tilt, sample.distance) {
            // No data at all: deliberately non-punitive.
            (None, None) => NEUTRAL_SCORE,

            // Face out of view: tilt-only degraded scale.
            (Some(tilt), None) => score_without_face(tilt, baseline),

            (None, Some(distance)) => {
                clamp_score(distance_zone_score(distance, baseline) * 100.0)
            }

            (Some(tilt), Some(distance)) => {
                let combined = self.tilt_weight * tilt_zone_score(tilt, baseline)
                    + self.distance_weight * distance_zone_score(distance, baseline);
                clamp_score(combined * 100.0)
            }
        };

        ScoreResult {
            score,
            level: level_for_score(score),
        }
    }
}

/// Reminder level derived from the raw score.
///
/// This mapping picks the message wording; escalation intensity comes from
/// the controller's independent bad-streak mapping.
pub fn level_for_score(score: u8) -> ReminderLevel {
    match score {
        85..=u8::MAX => ReminderLevel::None,
        70..=84 => ReminderLevel::Gentle,
        40..=69 => ReminderLevel::Moderate,
        _ => ReminderLevel::Strong,
    }
}

/// Tilt zone score in [0, 1].
///
/// Anchors: excellent above `good_tilt · 1.15`, good down to `good_tilt`,
/// acceptable down to `bad_tilt`, warning down to `bad_tilt · 0.8`,
/// critical below. Non-decreasing in the tilt angle.
pub fn tilt_zone_score(tilt: f64, baseline: &Baseline) -> f64 {
    let good = baseline.good_tilt;
    let bad = baseline.bad_tilt;

    if tilt >= good * (1.0 + EXCELLENT_MARGIN) {
        1.0
    } else if tilt >= good {
        let range = good * EXCELLENT_MARGIN;
        0.85 + (tilt - good) / range * 0.15
    } else if tilt > bad {
        let range = good - bad;
        0.5 + (tilt - bad) / range * 0.35
    } else if tilt >= bad * 0.8 {
        let range = bad * 0.2;
        (tilt - bad * 0.8) / range * 0.5
    } else {
        0.0
    }
}

/// Distance zone score in [0, 1].
///
/// Keyed on the absolute deviation from `good_distance`, measured against
/// the good↔bad gap — too close and too far are treated symmetrically.
pub fn distance_zone_score(distance: f64, baseline: &Baseline) -> f64 {
    let deviation = (distance - baseline.good_distance).abs();
    let gap = (baseline.bad_distance - baseline.good_distance).abs();

    if deviation <= gap * EXCELLENT_MARGIN {
        1.0
    } else if deviation <= gap * 0.5 {
        let range = gap * 0.35;
        let position = deviation - gap * EXCELLENT_MARGIN;
        0.85 + (1.0 - position / range) * 0.15
    } else if deviation <= gap {
        let range = gap * 0.5;
        let position = deviation - gap * 0.5;
        0.5 + (1.0 - position / range) * 0.35
    } else if deviation <= gap * 1.5 {
        let range = gap * 0.5;
        let position = deviation - gap;
        0.5 * (1.0 - position / range)
    } else {
        0.0
    }
}

/// Tilt-only score used when the face is out of the camera's view.
///
/// Biased toward low scores unless the tilt is near the good anchor: a
/// missing face with an upright device is probably the user glancing away,
/// while a missing face with a low tilt is severe slouching.
fn score_without_face(tilt: f64, baseline: &Baseline) -> u8 {
    let good = baseline.good_tilt;
    let bad = baseline.bad_tilt;

    if tilt >= good * 0.9 {
        70
    } else if tilt >= bad {
        let ratio = (tilt - bad) / (good - bad);
        clamp_score(40.0 + ratio * 30.0)
    } else if tilt >= bad * 0.7 {
        let range = bad * 0.3;
        let ratio = (tilt - bad * 0.7) / range;
        clamp_score(10.0 + ratio * 30.0)
    } else {
        let critical_threshold = bad * 0.7;
        let ratio = (tilt / critical_threshold).clamp(0.0, 1.0);
        clamp_score(ratio * 10.0)
    }
}

fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

/// User-facing wording for a scored cycle.
///
/// A pure function of which readings were present, the score, and the
/// baseline — no hidden state, no dynamic dispatch.
pub fn feedback_message(
    tilt: Option<f64>,
    distance: Option<f64>,
    score: u8,
    baseline: &Baseline,
) -> String {
    let gap = (baseline.bad_distance - baseline.good_distance).abs();

    match (tilt, distance) {
        (None, None) => "Not enough data to assess posture".to_string(),

        (Some(tilt), None) => {
            if tilt >= baseline.good_tilt * 0.9 {
                "Posture looks acceptable".to_string()
            } else if tilt >= baseline.bad_tilt {
                "Raise your neck a little".to_string()
            } else {
                "Head tilted far down — straighten your neck".to_string()
            }
        }

        (None, Some(distance)) => {
            if score >= 85 {
                "Perfect screen distance".to_string()
            } else if score >= 70 {
                "Good screen distance".to_string()
            } else if distance < baseline.good_distance {
                "Hold the screen farther away".to_string()
            } else {
                "Bring the screen a little closer".to_string()
            }
        }

        (Some(tilt), Some(distance)) => {
            let deviation = (distance - baseline.good_distance).abs();
            if score >= 85 {
                "Perfect posture".to_string()
            } else if score >= 70 {
                "Good posture".to_string()
            } else if tilt < baseline.bad_tilt && deviation > gap {
                "Adjust both your neck angle and screen distance".to_string()
            } else if tilt < baseline.bad_tilt {
                format!(
                    "Straighten your neck (now {:.0}°, target {:.0}°)",
                    tilt, baseline.good_tilt
                )
            } else if deviation > gap {
                if distance < baseline.good_distance {
                    "Hold the screen farther away".to_string()
                } else {
                    "Bring the screen a little closer".to_string()
                }
            } else {
                "Sit up straight".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine() -> ScoreEngine {
        ScoreEngine::default()
    }

    fn sample(tilt: Option<f64>, distance: Option<f64>) -> SensorSample {
        SensorSample { tilt, distance }
    }

    #[test]
    fn test_no_data_scores_neutral_fifty() {
        let result = engine().score(&sample(None, None), &Baseline::default());
        assert_eq!(result.score, 50);
        assert_eq!(result.level, ReminderLevel::Moderate);
    }

    #[test]
    fn test_excellent_posture_scores_at_least_85() {
        let baseline = Baseline::default();
        let gap = (baseline.bad_distance - baseline.good_distance).abs();

        for tilt in [baseline.good_tilt, baseline.good_tilt + 5.0, 90.0] {
            for offset in [0.0, gap * 0.1, -(gap * 0.14)] {
                let distance = baseline.good_distance + offset;
                let result = engine().score(&sample(Some(tilt), Some(distance)), &baseline);
                assert!(
                    result.score >= 85,
                    "tilt={tilt} distance={distance} scored {}",
                    result.score
                );
                assert_eq!(result.level, ReminderLevel::None);
            }
        }
    }

    #[test]
    fn test_tilt_zone_score_is_non_decreasing() {
        let baseline = Baseline::default();
        let mut previous = 0.0;
        let mut tilt = 0.0;
        while tilt <= 95.0 {
            let score = tilt_zone_score(tilt, &baseline);
            assert!(
                score >= previous,
                "zone score decreased at tilt={tilt}: {score} < {previous}"
            );
            previous = score;
            tilt += 0.5;
        }
    }

    #[test]
    fn test_tilt_zone_boundaries() {
        let baseline = Baseline::default();

        // Excellent: above the good anchor plus the 15% margin.
        assert_eq!(tilt_zone_score(baseline.good_tilt * 1.16, &baseline), 1.0);
        // Good floor.
        assert!((tilt_zone_score(baseline.good_tilt, &baseline) - 0.85).abs() < 1e-9);
        // Acceptable midpoint: halfway between bad and good sits at 0.675.
        let mid = (baseline.good_tilt + baseline.bad_tilt) / 2.0;
        assert!((tilt_zone_score(mid, &baseline) - 0.675).abs() < 1e-9);
        // Warning floor and critical.
        assert_eq!(tilt_zone_score(baseline.bad_tilt * 0.8, &baseline), 0.0);
        assert_eq!(tilt_zone_score(0.0, &baseline), 0.0);
    }

    #[test]
    fn test_distance_deviation_is_symmetric() {
        let baseline = Baseline::default();
        let gap = (baseline.bad_distance - baseline.good_distance).abs();

        let near = distance_zone_score(baseline.good_distance + gap * 0.3, &baseline);
        let far = distance_zone_score(baseline.good_distance - gap * 0.3, &baseline);
        assert!((near - far).abs() < 1e-9);
    }

    #[test]
    fn test_distance_zone_boundaries() {
        let baseline = Baseline::default();
        let gap = (baseline.bad_distance - baseline.good_distance).abs();

        assert_eq!(distance_zone_score(baseline.good_distance, &baseline), 1.0);
        assert_eq!(
            distance_zone_score(baseline.good_distance + gap * 0.1, &baseline),
            1.0
        );
        // At the full gap the acceptable zone bottoms out at 0.5.
        assert!(
            (distance_zone_score(baseline.good_distance + gap, &baseline) - 0.5).abs() < 1e-9
        );
        // Past 1.5x the gap: critical.
        assert_eq!(
            distance_zone_score(baseline.good_distance + gap * 1.6, &baseline),
            0.0
        );
    }

    #[test]
    fn test_tilt_only_degraded_scale() {
        let baseline = Baseline::default(); // good 70, bad 30

        // Near-good tilt passes with a capped 70.
        assert_eq!(engine().score(&sample(Some(63.0), None), &baseline).score, 70);
        // At the bad threshold the degraded ramp starts at 40.
        assert_eq!(engine().score(&sample(Some(30.0), None), &baseline).score, 40);
        // Halfway between bad and good: 40 + 0.5 * 30 = 55.
        assert_eq!(engine().score(&sample(Some(50.0), None), &baseline).score, 55);
        // At 0.7 * bad_tilt the lower ramp starts at 10.
        assert_eq!(engine().score(&sample(Some(21.0), None), &baseline).score, 10);
        // Deep critical: proportional 0-10.
        assert_eq!(engine().score(&sample(Some(10.5), None), &baseline).score, 5);
        assert_eq!(engine().score(&sample(Some(0.0), None), &baseline).score, 0);
    }

    #[test]
    fn test_distance_only_uses_distance_zone() {
        let baseline = Baseline::default();
        let result = engine().score(&sample(None, Some(baseline.good_distance)), &baseline);
        assert_eq!(result.score, 100);
        assert_eq!(result.level, ReminderLevel::None);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_score(100), ReminderLevel::None);
        assert_eq!(level_for_score(85), ReminderLevel::None);
        assert_eq!(level_for_score(84), ReminderLevel::Gentle);
        assert_eq!(level_for_score(70), ReminderLevel::Gentle);
        assert_eq!(level_for_score(69), ReminderLevel::Moderate);
        assert_eq!(level_for_score(40), ReminderLevel::Moderate);
        assert_eq!(level_for_score(39), ReminderLevel::Strong);
        assert_eq!(level_for_score(0), ReminderLevel::Strong);
    }

    #[test]
    fn test_feedback_message_branches() {
        let baseline = Baseline::default();

        assert_eq!(
            feedback_message(None, None, 50, &baseline),
            "Not enough data to assess posture"
        );
        assert_eq!(
            feedback_message(Some(65.0), None, 70, &baseline),
            "Posture looks acceptable"
        );
        assert_eq!(
            feedback_message(Some(40.0), None, 47, &baseline),
            "Raise your neck a little"
        );
        assert_eq!(
            feedback_message(None, Some(0.2), 30, &baseline),
            "Hold the screen farther away"
        );
        assert_eq!(
            feedback_message(Some(75.0), Some(0.8), 95, &baseline),
            "Perfect posture"
        );
        assert_eq!(
            feedback_message(Some(25.0), Some(0.8), 45, &baseline),
            "Straighten your neck (now 25°, target 70°)"
        );
        assert_eq!(
            feedback_message(Some(25.0), Some(1.5), 10, &baseline),
            "Adjust both your neck angle and screen distance"
        );
    }
}
