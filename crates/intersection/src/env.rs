//! Gym-style adapter around the [`EpisodeController`].
//!
//! A learning framework that thinks in `(obs, reward, done)` steps sees one
//! step per decision request: [`Env::step`] applies the action, then runs the
//! simulation clock until the next request or the end of the episode and
//! returns the reward collected on the way.

use crate::controller::{EpisodeController, EpisodePhase, TickOutcome};
use crate::policy::OBSERVATION_SIZE;
use crate::stats::{EpisodeReporter, EpisodeStats};

/// Reinforcement learning environment interface.
pub trait Env {
    /// Advances the environment by one action.
    ///
    /// Returns `(obs, reward, done)`.
    fn step(&mut self, action: i64) -> (Vec<f32>, f32, bool);

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Vec<f32>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;
}

/// Vehicle spawning and motion around the intersection.
///
/// The traffic side feeds the controller through its vehicle notifications
/// and reads the lights back from it. It is advanced once per tick, before
/// the controller.
pub trait TrafficSource {
    /// Clears all vehicles for a new episode.
    fn reset(&mut self);

    /// Moves traffic forward by `dt` seconds. Returns the episode record if
    /// a generator notification ended the episode.
    fn advance<R: EpisodeReporter>(
        &mut self,
        dt: f32,
        controller: &mut EpisodeController<R>,
    ) -> Option<EpisodeStats>;
}

pub struct IntersectionEnv<T, R> {
    controller: EpisodeController<R>,
    traffic: T,
    dt: f32,
    max_ticks_per_step: u64,
    awaiting_decision: bool,
    last_episode: Option<EpisodeStats>,
}

impl<T: TrafficSource, R: EpisodeReporter> IntersectionEnv<T, R> {
    /// Ticks run per step before giving control back without a decision.
    pub const DEFAULT_MAX_TICKS_PER_STEP: u64 = 100_000;

    #[must_use]
    pub fn new(controller: EpisodeController<R>, traffic: T, dt: f32) -> Self {
        Self {
            controller,
            traffic,
            dt,
            max_ticks_per_step: Self::DEFAULT_MAX_TICKS_PER_STEP,
            awaiting_decision: false,
            last_episode: None,
        }
    }

    /// Builder: cap the number of ticks a single step may run.
    #[must_use]
    pub fn with_max_ticks_per_step(mut self, ticks: u64) -> Self {
        self.max_ticks_per_step = ticks.max(1);
        self
    }

    #[must_use]
    pub fn controller(&self) -> &EpisodeController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EpisodeController<R> {
        &mut self.controller
    }

    #[must_use]
    pub fn traffic(&self) -> &T {
        &self.traffic
    }

    /// Whether the last step stopped on a decision request. A step that ran
    /// out of ticks or ended the episode leaves nothing to answer.
    #[must_use]
    pub const fn awaiting_decision(&self) -> bool {
        self.awaiting_decision
    }

    /// Record of the most recently finished episode.
    #[must_use]
    pub fn last_episode(&self) -> Option<&EpisodeStats> {
        self.last_episode.as_ref()
    }

    fn finish(&mut self, stats: EpisodeStats) -> (Vec<f32>, f32, bool) {
        let obs = self.controller.observe().to_vec();
        let reward = self.controller.take_reward();
        self.last_episode = Some(stats);
        (obs, reward, true)
    }
}

impl<T: TrafficSource, R: EpisodeReporter> Env for IntersectionEnv<T, R> {
    fn step(&mut self, action: i64) -> (Vec<f32>, f32, bool) {
        if self.controller.phase() == EpisodePhase::Begin {
            self.reset();
        }
        self.controller.apply_action(action);
        self.awaiting_decision = false;

        for _ in 0..self.max_ticks_per_step {
            if let Some(stats) = self.traffic.advance(self.dt, &mut self.controller) {
                return self.finish(stats);
            }
            match self.controller.tick(self.dt) {
                TickOutcome::Running => {}
                TickOutcome::DecisionRequested(observation) => {
                    self.awaiting_decision = true;
                    return (observation.to_vec(), self.controller.take_reward(), false);
                }
                TickOutcome::Ended(stats) => return self.finish(stats),
            }
        }

        tracing::warn!(
            ticks = self.max_ticks_per_step,
            "no decision request within tick budget"
        );
        (self.controller.observe().to_vec(), self.controller.take_reward(), false)
    }

    /// Starts a fresh episode. Reward still pending from an abandoned
    /// episode is dropped.
    fn reset(&mut self) -> Vec<f32> {
        self.controller.take_reward();
        self.awaiting_decision = false;
        self.controller.begin_episode();
        self.traffic.reset();
        self.controller.observe().to_vec()
    }

    fn obs_size(&self) -> usize {
        OBSERVATION_SIZE
    }

    fn action_size(&self) -> usize {
        2
    }
}
