//! Reward assignment.
//!
//! Every delta is added both to the episode total and to a pending balance
//! that the learning side collects with [`RewardAccumulator::take_pending`].

use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::semaphore::SemaphoreState;

/// Episode reward split by source. The components sum to the cumulative
/// reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub wait_penalty: f32,
    pub goal: f32,
    pub throughput: f32,
    pub accident: f32,
}

impl RewardBreakdown {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.wait_penalty + self.goal + self.throughput + self.accident
    }
}

/// Ratio of vehicles that crossed the zone to vehicles detected at the
/// semaphores, or `None` when nothing was detected.
#[must_use]
pub fn throughput_ratio(passed: u64, detected: u64) -> Option<f32> {
    if detected == 0 {
        None
    } else {
        Some(passed as f32 / detected as f32)
    }
}

#[derive(Clone, Debug)]
pub struct RewardAccumulator {
    config: RewardConfig,
    breakdown: RewardBreakdown,
    cumulative: f32,
    pending: f32,
}

impl RewardAccumulator {
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self {
            config,
            breakdown: RewardBreakdown::default(),
            cumulative: 0.0,
            pending: 0.0,
        }
    }

    /// Clears the episode total and breakdown. Pending reward survives until
    /// it is taken, so a terminal reward is never lost to the next episode.
    pub fn start_episode(&mut self) {
        self.breakdown = RewardBreakdown::default();
        self.cumulative = 0.0;
    }

    fn add(&mut self, delta: f32) {
        self.cumulative += delta;
        self.pending += delta;
    }

    /// Penalises every approach whose wait timer is below zero, once per
    /// call. Returns the total applied.
    pub fn apply_wait_penalties(&mut self, semaphores: &[SemaphoreState]) -> f32 {
        let mut applied = 0.0;
        for semaphore in semaphores.iter().filter(|s| s.is_overdue()) {
            let delta = -self.config.wait_penalty_per_car * semaphore.cars_queued() as f32;
            tracing::trace!(approach = %semaphore.approach(), delta, "wait penalty");
            self.breakdown.wait_penalty += delta;
            self.add(delta);
            applied += delta;
        }
        applied
    }

    /// A vehicle completed its crossing.
    pub fn goal(&mut self) {
        let delta = self.config.goal_bonus;
        self.breakdown.goal += delta;
        self.add(delta);
    }

    /// Grants the terminal throughput reward and returns it.
    ///
    /// When no vehicle was ever detected the ratio is undefined and the
    /// reward is zero.
    pub fn throughput(&mut self, passed: u64, detected: u64) -> f32 {
        let delta = throughput_ratio(passed, detected).unwrap_or_else(|| {
            tracing::warn!(passed, "no vehicles detected this episode; throughput reward is zero");
            0.0
        });
        self.breakdown.throughput += delta;
        self.add(delta);
        delta
    }

    /// Grants the terminal accident penalty.
    pub fn accident(&mut self) {
        let delta = -self.config.accident_penalty;
        self.breakdown.accident += delta;
        self.add(delta);
    }

    /// Reward accrued since the previous call.
    pub fn take_pending(&mut self) -> f32 {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub const fn pending(&self) -> f32 {
        self.pending
    }

    #[must_use]
    pub const fn cumulative(&self) -> f32 {
        self.cumulative
    }

    #[must_use]
    pub const fn breakdown(&self) -> RewardBreakdown {
        self.breakdown
    }
}
