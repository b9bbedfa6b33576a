//! Monitor configuration
//!
//! Every tunable of the control loop lives here: sampling cadence bounds,
//! probe retry policy, scoring weights, and the tilt filter constant.
//! Defaults match the reference behavior; a config can also be loaded from
//! JSON for experimentation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Configuration for the posture monitoring loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Initial inter-cycle delay (ms)
    pub initial_delay_ms: u64,
    /// Upper bound on the adaptive inter-cycle delay (ms)
    pub max_delay_ms: u64,
    /// Consecutive acceptable cycles before the delay starts doubling
    pub good_streak_threshold: u32,
    /// Multiplier applied to the delay once the streak threshold is reached
    pub backoff_multiplier: f64,

    /// Maximum detection attempts per distance read
    pub max_distance_attempts: u32,
    /// Per-attempt deadline for the distance detector (ms)
    pub distance_attempt_timeout_ms: u64,
    /// Pause between failed distance attempts (ms)
    pub distance_retry_delay_ms: u64,

    /// Deadline for the first accelerometer sample of a tilt read (ms)
    pub tilt_read_timeout_ms: u64,
    /// Low-pass filter constant for the gravity vector (0..1)
    pub tilt_filter_alpha: f64,

    /// Weight of the tilt zone score in the combined score
    pub tilt_weight: f64,
    /// Weight of the distance zone score in the combined score
    pub distance_weight: f64,

    /// Polling interval while a blocking overlay is visible (ms)
    pub overlay_poll_ms: u64,
    /// Grace period for in-flight probes to unwind on shutdown (ms)
    pub shutdown_grace_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 5_000,
            max_delay_ms: 60_000,
            good_streak_threshold: 3,
            backoff_multiplier: 2.0,
            max_distance_attempts: 5,
            distance_attempt_timeout_ms: 3_000,
            distance_retry_delay_ms: 500,
            tilt_read_timeout_ms: 2_000,
            tilt_filter_alpha: 0.8,
            tilt_weight: 0.5,
            distance_weight: 0.5,
            overlay_poll_ms: 100,
            shutdown_grace_ms: 2_000,
        }
    }
}

impl MonitorConfig {
    /// Load a configuration from JSON, rejecting invalid values.
    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.initial_delay_ms == 0 || self.max_delay_ms < self.initial_delay_ms {
            return Err(MonitorError::InvalidConfig(format!(
                "delay bounds out of order: initial={}ms max={}ms",
                self.initial_delay_ms, self.max_delay_ms
            )));
        }
        if self.backoff_multiplier < 1.0 || !self.backoff_multiplier.is_finite() {
            return Err(MonitorError::InvalidConfig(format!(
                "backoff multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            )));
        }
        if self.max_distance_attempts == 0 {
            return Err(MonitorError::InvalidConfig(
                "max_distance_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.tilt_filter_alpha) {
            return Err(MonitorError::InvalidConfig(format!(
                "tilt_filter_alpha must be in [0, 1), got {}",
                self.tilt_filter_alpha
            )));
        }
        let weight_sum = self.tilt_weight + self.distance_weight;
        if !weight_sum.is_finite() || (weight_sum - 1.0).abs() > 1e-9 {
            return Err(MonitorError::InvalidConfig(format!(
                "scoring weights must sum to 1.0, got {} + {}",
                self.tilt_weight, self.distance_weight
            )));
        }
        Ok(())
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn distance_attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.distance_attempt_timeout_ms)
    }

    pub fn distance_retry_delay(&self) -> Duration {
        Duration::from_millis(self.distance_retry_delay_ms)
    }

    pub fn tilt_read_timeout(&self) -> Duration {
        Duration::from_millis(self.tilt_read_timeout_ms)
    }

    pub fn overlay_poll_interval(&self) -> Duration {
        Duration::from_millis(self.overlay_poll_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = MonitorConfig::default();
        let json = config.to_json().unwrap();
        let loaded = MonitorConfig::from_json(&json).unwrap();
        assert_eq!(loaded.initial_delay_ms, config.initial_delay_ms);
        assert_eq!(loaded.tilt_filter_alpha, config.tilt_filter_alpha);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded = MonitorConfig::from_json(r#"{"initial_delay_ms": 1000}"#).unwrap();
        assert_eq!(loaded.initial_delay_ms, 1_000);
        assert_eq!(loaded.max_delay_ms, 60_000);
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let mut config = MonitorConfig::default();
        config.tilt_weight = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_delay_bounds() {
        let mut config = MonitorConfig::default();
        config.max_delay_ms = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let mut config = MonitorConfig::default();
        config.max_distance_attempts = 0;
        assert!(config.validate().is_err());
    }
}
