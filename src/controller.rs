//! Escalation and adaptive sampling cadence
//!
//! Tracks consecutive good and bad cycles and derives two things from
//! them: how long to wait before the next sample, and how intrusively to
//! notify. The cadence behaves like congestion control — sustained good
//! posture backs the sampling rate off multiplicatively, a Strong cycle is
//! a loss event that hard-resets the delay to its initial value.

use std::time::Duration;

use tracing::debug;

use crate::config::MonitorConfig;
use crate::types::ReminderLevel;

/// Outcome of folding one scored cycle into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Delay before the next sampling cycle
    pub next_delay: Duration,
    /// Escalation level to forward to the notification boundary
    pub notify_level: ReminderLevel,
}

/// Per-session escalation state.
///
/// Owned exclusively by the scheduler and mutated between cycles only, so
/// it needs no synchronization.
#[derive(Debug, Clone)]
pub struct EscalationController {
    good_counter: u32,
    bad_counter: u32,
    current_delay: Duration,
    initial_delay: Duration,
    max_delay: Duration,
    good_streak_threshold: u32,
    backoff_multiplier: f64,
}

impl EscalationController {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            good_counter: 0,
            bad_counter: 0,
            current_delay: config.initial_delay(),
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
            good_streak_threshold: config.good_streak_threshold,
            backoff_multiplier: config.backoff_multiplier,
        }
    }

    /// Delay the scheduler should sleep before the next cycle.
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    pub fn good_streak(&self) -> u32 {
        self.good_counter
    }

    pub fn bad_streak(&self) -> u32 {
        self.bad_counter
    }

    /// Fold one completed cycle's score-derived level into the state.
    ///
    /// A Strong cycle resets the delay to its initial value and grows the
    /// bad streak; any other level counts as acceptable for cadence
    /// purposes and, once the streak threshold is reached, doubles the
    /// delay up to the cap on every further acceptable cycle.
    pub fn update(&mut self, level: ReminderLevel) -> Decision {
        if level == ReminderLevel::Strong {
            self.bad_counter += 1;
            self.good_counter = 0;
            self.current_delay = self.initial_delay;
        } else {
            self.good_counter += 1;
            self.bad_counter = 0;
            if self.good_counter >= self.good_streak_threshold {
                self.current_delay = self
                    .current_delay
                    .mul_f64(self.backoff_multiplier)
                    .min(self.max_delay);
            }
        }

        let decision = Decision {
            next_delay: self.current_delay,
            notify_level: notify_level_for_streak(self.bad_counter),
        };
        debug!(
            good = self.good_counter,
            bad = self.bad_counter,
            delay_ms = self.current_delay.as_millis() as u64,
            notify = decision.notify_level.as_str(),
            "controller updated"
        );
        decision
    }

    /// Full reset, used when the device goes inactive.
    pub fn reset(&mut self) {
        self.good_counter = 0;
        self.bad_counter = 0;
        self.current_delay = self.initial_delay;
    }
}

/// Notification escalation from the consecutive-bad-cycle streak.
///
/// Independent of the score-derived [`ReminderLevel`]: intensity only
/// climbs through repeated Strong cycles, giving the user a few gentle
/// nudges before an intrusive overlay appears.
pub fn notify_level_for_streak(bad_streak: u32) -> ReminderLevel {
    match bad_streak {
        0 => ReminderLevel::None,
        1 => ReminderLevel::Gentle,
        2 => ReminderLevel::Moderate,
        _ => ReminderLevel::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn controller() -> EscalationController {
        EscalationController::new(&MonitorConfig::default())
    }

    #[test]
    fn test_notification_ladder_escalates_through_strong_cycles() {
        let mut ctrl = controller();

        let first = ctrl.update(ReminderLevel::Strong);
        let second = ctrl.update(ReminderLevel::Strong);
        let third = ctrl.update(ReminderLevel::Strong);

        assert_eq!(first.notify_level, ReminderLevel::Gentle);
        assert_eq!(second.notify_level, ReminderLevel::Moderate);
        assert_eq!(third.notify_level, ReminderLevel::Strong);
        assert_eq!(ctrl.bad_streak(), 3);
    }

    #[test]
    fn test_strong_reset_is_idempotent_on_delay() {
        let mut ctrl = controller();
        let initial = ctrl.current_delay();

        // Grow the delay first so the reset is observable.
        for _ in 0..4 {
            ctrl.update(ReminderLevel::None);
        }
        assert!(ctrl.current_delay() > initial);

        ctrl.update(ReminderLevel::Strong);
        assert_eq!(ctrl.current_delay(), initial);
        ctrl.update(ReminderLevel::Strong);
        assert_eq!(ctrl.current_delay(), initial);
    }

    #[test]
    fn test_acceptable_cycle_clears_bad_streak() {
        let mut ctrl = controller();
        ctrl.update(ReminderLevel::Strong);
        ctrl.update(ReminderLevel::Strong);

        let decision = ctrl.update(ReminderLevel::Gentle);
        assert_eq!(decision.notify_level, ReminderLevel::None);
        assert_eq!(ctrl.bad_streak(), 0);
    }

    #[test]
    fn test_adaptive_growth_bound() {
        // After k consecutive acceptable cycles (k >= 3) the delay is
        // min(5000 * 2^(k-2), 60000).
        let mut ctrl = controller();
        for k in 1u32..=8 {
            let decision = ctrl.update(ReminderLevel::None);
            let expected_ms = if k < 3 {
                5_000
            } else {
                (5_000u64 * 2u64.pow(k - 2)).min(60_000)
            };
            assert_eq!(
                decision.next_delay,
                Duration::from_millis(expected_ms),
                "wrong delay after {k} acceptable cycles"
            );
        }
        // Bounded by the cap from here on.
        let decision = ctrl.update(ReminderLevel::Moderate);
        assert_eq!(decision.next_delay, Duration::from_millis(60_000));
    }

    #[test]
    fn test_moderate_and_gentle_count_as_acceptable() {
        let mut ctrl = controller();
        ctrl.update(ReminderLevel::Gentle);
        ctrl.update(ReminderLevel::Moderate);
        ctrl.update(ReminderLevel::None);
        assert_eq!(ctrl.good_streak(), 3);
        assert!(ctrl.current_delay() > Duration::from_millis(5_000));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut ctrl = controller();
        ctrl.update(ReminderLevel::Strong);
        ctrl.update(ReminderLevel::None);
        ctrl.update(ReminderLevel::None);
        ctrl.update(ReminderLevel::None);

        ctrl.reset();
        assert_eq!(ctrl.good_streak(), 0);
        assert_eq!(ctrl.bad_streak(), 0);
        assert_eq!(ctrl.current_delay(), Duration::from_millis(5_000));
    }

    #[test]
    fn test_streak_to_level_mapping() {
        assert_eq!(notify_level_for_streak(0), ReminderLevel::None);
        assert_eq!(notify_level_for_streak(1), ReminderLevel::Gentle);
        assert_eq!(notify_level_for_streak(2), ReminderLevel::Moderate);
        assert_eq!(notify_level_for_streak(3), ReminderLevel::Strong);
        assert_eq!(notify_level_for_streak(10), ReminderLevel::Strong);
    }
}
