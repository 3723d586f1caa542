//! Controller configuration.
//!
//! Values are handed to [`EpisodeController::new`](crate::EpisodeController::new)
//! explicitly; nothing is read from process-wide state. Every field has a
//! default, so a JSON document only needs to name the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Vehicle cap used when none is configured.
pub const DEFAULT_MAX_TOTAL_VEHICLES: u64 = 10_000_000;

/// Shortest accepted decision poll interval in seconds.
pub const MIN_DECISION_INTERVAL: f32 = 0.1;
/// Longest accepted decision poll interval in seconds.
pub const MAX_DECISION_INTERVAL: f32 = 5.0;

/// Reward magnitudes. Penalties are stored as positive numbers and applied
/// with a negative sign.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Penalty per queued vehicle for every tick an approach's wait timer is
    /// below zero.
    pub wait_penalty_per_car: f32,
    /// One-off penalty when the episode ends in an accident.
    pub accident_penalty: f32,
    /// Bonus for each vehicle that completes its crossing.
    pub goal_bonus: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            wait_penalty_per_car: 0.1,
            accident_penalty: 0.5,
            goal_bonus: 0.1,
        }
    }
}

/// Configuration for an [`EpisodeController`](crate::EpisodeController).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Vehicles spawned per episode before the cap check can end it.
    /// `0` means unset and falls back to [`DEFAULT_MAX_TOTAL_VEHICLES`].
    pub max_total_vehicles: u64,
    /// Value each semaphore's wait timer is reset to, in seconds.
    pub wait_timer_limit: f32,
    /// Seconds between decision polls.
    pub decision_interval: f32,
    pub rewards: RewardConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_total_vehicles: 0,
            wait_timer_limit: 10.0,
            decision_interval: 1.0,
            rewards: RewardConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Parses a JSON document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any error
    /// reported by [`ControllerConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set the per-episode vehicle cap.
    #[must_use]
    pub const fn with_max_total_vehicles(mut self, cap: u64) -> Self {
        self.max_total_vehicles = cap;
        self
    }

    /// Builder: set the wait timer limit.
    #[must_use]
    pub const fn with_wait_timer_limit(mut self, seconds: f32) -> Self {
        self.wait_timer_limit = seconds;
        self
    }

    /// Builder: set the decision poll interval.
    #[must_use]
    pub const fn with_decision_interval(mut self, seconds: f32) -> Self {
        self.decision_interval = seconds;
        self
    }

    /// Effective vehicle cap, resolving the unset value.
    #[must_use]
    pub const fn vehicle_cap(&self) -> u64 {
        if self.max_total_vehicles == 0 {
            DEFAULT_MAX_TOTAL_VEHICLES
        } else {
            self.max_total_vehicles
        }
    }

    /// Checks every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.decision_interval;
        if !(MIN_DECISION_INTERVAL..=MAX_DECISION_INTERVAL).contains(&interval) {
            return Err(ConfigError::DecisionInterval {
                value: interval,
                min: MIN_DECISION_INTERVAL,
                max: MAX_DECISION_INTERVAL,
            });
        }
        if !self.wait_timer_limit.is_finite() || self.wait_timer_limit <= 0.0 {
            return Err(ConfigError::WaitTimerLimit(self.wait_timer_limit));
        }
        let weights = [
            ("wait_penalty_per_car", self.rewards.wait_penalty_per_car),
            ("accident_penalty", self.rewards.accident_penalty),
            ("goal_bonus", self.rewards.goal_bonus),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::RewardWeight(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_cap_falls_back_to_default() {
        assert_eq!(ControllerConfig::default().vehicle_cap(), DEFAULT_MAX_TOTAL_VEHICLES);
        let config = ControllerConfig::default().with_max_total_vehicles(5);
        assert_eq!(config.vehicle_cap(), 5);
    }

    #[test]
    fn nan_interval_is_rejected() {
        let config = ControllerConfig::default().with_decision_interval(f32::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::DecisionInterval { .. })));
    }
}
