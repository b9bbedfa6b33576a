//! Core types for the posture monitoring engine
//!
//! This module defines the data that flows through one sampling cycle:
//! raw sensor readings, the fused sample, the personalized baseline, the
//! score, and the event record handed to the external logger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discrete escalation tier for posture reminders.
///
/// Ordered: `None < Gentle < Moderate < Strong`. Two independent mappings
/// produce this type — one from the raw score (what to say) and one from
/// the consecutive-bad-cycle counter (how intrusively to interrupt). They
/// are deliberately distinct scales and must not be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderLevel {
    None,
    Gentle,
    Moderate,
    Strong,
}

impl ReminderLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderLevel::None => "none",
            ReminderLevel::Gentle => "gentle",
            ReminderLevel::Moderate => "moderate",
            ReminderLevel::Strong => "strong",
        }
    }
}

/// Device screen rotation.
///
/// Selects which gravity axis is treated as the primary axis when
/// computing the tilt angle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// One raw 3-axis accelerometer reading (gravity direction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelSample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Personalized reference values for "good" and "bad" posture.
///
/// Derived once from two calibration captures (a healthy-posture sample and
/// a slouching sample), read-only thereafter. `good_tilt` is expected to
/// exceed `bad_tilt` (straighter posture means a larger angle from
/// horizontal); the two distances are not ordered a priori — scoring treats
/// deviation from `good_distance` symmetrically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Healthy posture tilt angle (degrees)
    pub good_tilt: f64,
    /// Healthy posture face distance ratio
    pub good_distance: f64,
    /// Slouching tilt angle — warning threshold (degrees)
    pub bad_tilt: f64,
    /// Slouching face distance ratio — warning threshold
    pub bad_distance: f64,
}

impl Default for Baseline {
    /// Default ranges used when calibration has not been done.
    fn default() -> Self {
        Self {
            good_tilt: 70.0,
            good_distance: 0.8,
            bad_tilt: 30.0,
            bad_distance: 0.4,
        }
    }
}

/// Sensor readings fused in one sampling cycle.
///
/// Either field may be absent: no face in view, or no tilt reading
/// available before the read deadline. Absence is never an error — the
/// scoring engine has dedicated partial-data branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Tilt angle (degrees from horizontal)
    pub tilt: Option<f64>,
    /// Face distance ratio (inverse-proportional to face size)
    pub distance: Option<f64>,
}

/// Outcome of scoring one sensor sample against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Posture score, 0 (worst) to 100 (best)
    pub score: u8,
    /// Reminder level derived from the raw score
    pub level: ReminderLevel,
}

/// One logged posture observation.
///
/// Handed to the external event logger after every completed cycle; the
/// logger is best-effort and its failures never affect the control loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureEvent {
    /// When the cycle completed (UTC)
    pub timestamp: DateTime<Utc>,
    /// Monitoring session this cycle belongs to
    pub session_id: Uuid,
    /// Whether the cycle was classified as good posture (level < Strong)
    pub good_posture: bool,
    /// Posture score for the cycle
    pub score: u8,
    /// Tilt angle if available (degrees)
    pub tilt: Option<f64>,
    /// Face distance ratio if available
    pub distance: Option<f64>,
    /// Score-derived reminder level for the cycle
    pub level: ReminderLevel,
}
