//! # Episode Controller
//!
//! Drives one intersection through a sequence of episodes. Each episode moves
//! through `Begin → Running → Ending → Begin`:
//!
//! - **Begin** resets the zone, semaphores, rewards and counters, bumps the
//!   episode index and arms the decision timer.
//! - **Running** advances on every [`EpisodeController::tick`]: wait timers
//!   and their penalties first, then the terminal checks, then the decision
//!   poll.
//! - **Ending** cancels the decision timer, grants the terminal reward,
//!   finalises the [`EpisodeStats`] record and hands it to the reporter.
//!
//! The controller is the only writer of the light colours, and every action
//! it applies turns one approach green and the other red, so the two
//! approaches are never green together.

use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::gate::{GateState, GeneratorGate};
use crate::policy::{Action, Observation, Policy};
use crate::reward::RewardAccumulator;
use crate::scheduler::{DecisionScheduler, Poll, PollToken};
use crate::semaphore::{Approach, SemaphoreState};
use crate::stats::{EpisodeOutcome, EpisodeReporter, EpisodeStats};
use crate::zone::IntersectionZone;

/// Lifecycle position of the controller between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Waiting for the next episode to begin. The next tick begins it.
    Begin,
    Running,
}

/// Requests to end the running episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndTrigger {
    Accident,
    CapReached,
    /// One spawn generator finished. Only the last one actually ends the
    /// episode.
    GeneratorFinished,
}

/// What happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Running,
    /// The decision poll fired. The caller answers with
    /// [`EpisodeController::apply_action`] before the next tick.
    DecisionRequested(Observation),
    Ended(EpisodeStats),
}

pub struct EpisodeController<R> {
    config: ControllerConfig,
    semaphores: [SemaphoreState; 2],
    zone: IntersectionZone,
    scheduler: DecisionScheduler,
    poll_token: Option<PollToken>,
    rewards: RewardAccumulator,
    generators: GeneratorGate,
    reporter: R,
    phase: EpisodePhase,
    episode_index: u64,
    elapsed: f32,
    step_count: u64,
    decisions: u64,
    vehicles_spawned: u64,
    vehicles_arrived: u64,
    accidents_total: u64,
}

impl<R: EpisodeReporter> EpisodeController<R> {
    /// Creates a controller in the [`EpisodePhase::Begin`] phase.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: ControllerConfig, reporter: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let limit = config.wait_timer_limit;
        Ok(Self {
            semaphores: Approach::ALL.map(|approach| SemaphoreState::new(approach, limit)),
            zone: IntersectionZone::new(),
            scheduler: DecisionScheduler::new(config.decision_interval),
            poll_token: None,
            rewards: RewardAccumulator::new(config.rewards.clone()),
            generators: GeneratorGate::default(),
            reporter,
            phase: EpisodePhase::Begin,
            episode_index: 0,
            elapsed: 0.0,
            step_count: 0,
            decisions: 0,
            vehicles_spawned: 0,
            vehicles_arrived: 0,
            accidents_total: 0,
            config,
        })
    }

    /// Starts a new episode, abandoning the current one if it is running.
    pub fn begin_episode(&mut self) {
        self.cancel_polling();

        self.episode_index += 1;
        self.zone.reset();
        for semaphore in &mut self.semaphores {
            semaphore.reset();
        }
        self.rewards.start_episode();
        self.generators.reset();
        self.elapsed = 0.0;
        self.step_count = 0;
        self.decisions = 0;
        self.vehicles_spawned = 0;
        self.vehicles_arrived = 0;

        self.poll_token = Some(self.scheduler.arm());
        self.phase = EpisodePhase::Running;
        tracing::debug!(episode = self.episode_index, "episode started");
    }

    /// Advances the episode by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.phase == EpisodePhase::Begin {
            self.begin_episode();
        }

        self.elapsed += dt;
        self.step_count += 1;

        for semaphore in &mut self.semaphores {
            if semaphore.tick(dt) {
                tracing::debug!(
                    approach = %semaphore.approach(),
                    queued = semaphore.cars_queued(),
                    "wait timer expired"
                );
            }
        }
        self.rewards.apply_wait_penalties(&self.semaphores);

        if self.zone.accident_occurred() {
            if let Some(stats) = self.end_episode(EndTrigger::Accident) {
                return TickOutcome::Ended(stats);
            }
        }
        let cap = self.config.vehicle_cap();
        if self.vehicles_spawned == cap && self.vehicles_arrived == cap {
            if let Some(stats) = self.end_episode(EndTrigger::CapReached) {
                return TickOutcome::Ended(stats);
            }
        }

        let semaphores = &self.semaphores;
        let poll = self
            .scheduler
            .advance(dt, || semaphores.iter().any(|s| s.cars_queued() > 0));
        if poll == Poll::Request {
            self.decisions += 1;
            let observation = self.observe();
            tracing::debug!(episode = self.episode_index, ?observation, "decision requested");
            TickOutcome::DecisionRequested(observation)
        } else {
            TickOutcome::Running
        }
    }

    /// Ticks and answers any decision request with `policy` straight away.
    pub fn tick_with(&mut self, dt: f32, policy: &mut impl Policy) -> TickOutcome {
        let outcome = self.tick(dt);
        if let TickOutcome::DecisionRequested(observation) = &outcome {
            let raw = policy.decide(observation);
            self.apply_action(raw);
        }
        outcome
    }

    /// Current observation, North first.
    #[must_use]
    pub fn observe(&self) -> Observation {
        Observation {
            approaches: [(&self.semaphores[0]).into(), (&self.semaphores[1]).into()],
        }
    }

    /// Applies a raw discrete action. Unknown values change nothing and
    /// return `None`.
    pub fn apply_action(&mut self, raw: i64) -> Option<Action> {
        let Some(action) = Action::from_discrete(raw) else {
            tracing::trace!(raw, "ignoring out-of-range action");
            return None;
        };
        let green = action.green_approach();
        self.semaphores[green.opposite().index()].set_green(false);
        self.semaphores[green.index()].set_green(true);
        tracing::debug!(?action, "lights switched");
        Some(action)
    }

    /// A spawn generator produced a vehicle.
    pub fn vehicle_spawned(&mut self) {
        self.vehicles_spawned += 1;
    }

    pub fn vehicle_detected(&mut self, approach: Approach) {
        self.semaphores[approach.index()].vehicle_detected();
    }

    pub fn vehicle_released(&mut self, approach: Approach) {
        self.semaphores[approach.index()].vehicle_released();
    }

    /// A vehicle completed its crossing.
    pub fn vehicle_reached_goal(&mut self) {
        self.vehicles_arrived += 1;
        self.rewards.goal();
    }

    /// A spawn generator has nothing left to produce. Returns the episode
    /// record when this was the last generator.
    pub fn generator_finished(&mut self) -> Option<EpisodeStats> {
        self.end_episode(EndTrigger::GeneratorFinished)
    }

    /// Ends the running episode.
    ///
    /// Returns `None` when no episode is running or when a generator
    /// trigger is still waiting for its partner. An accident latched in the
    /// zone always ends the episode as an accident, whatever the trigger.
    pub fn end_episode(&mut self, trigger: EndTrigger) -> Option<EpisodeStats> {
        if self.phase != EpisodePhase::Running {
            return None;
        }
        if trigger == EndTrigger::GeneratorFinished {
            if let GateState::Waiting { remaining } = self.generators.arrive() {
                tracing::debug!(remaining, "generator finished, waiting for the rest");
                return None;
            }
        }

        self.cancel_polling();

        let outcome = if trigger == EndTrigger::Accident || self.zone.accident_occurred() {
            EpisodeOutcome::Accident
        } else if trigger == EndTrigger::CapReached {
            EpisodeOutcome::CapReached
        } else {
            EpisodeOutcome::GeneratorsFinished
        };

        let detected = self.vehicles_detected();
        if outcome.is_accident() {
            self.accidents_total += 1;
            self.rewards.accident();
        } else {
            self.rewards
                .throughput(self.zone.total_vehicles_passed(), detected[0] + detected[1]);
        }

        let averages = self.zone.compute_averages();
        let stats = EpisodeStats {
            episode: self.episode_index,
            outcome,
            accident: outcome.is_accident(),
            duration: self.elapsed,
            steps: self.step_count,
            decisions: self.decisions,
            vehicles_spawned: self.vehicles_spawned,
            vehicles_arrived: self.vehicles_arrived,
            vehicles_passed: self.zone.total_vehicles_passed(),
            vehicles_detected: detected,
            averages,
            cumulative_reward: self.rewards.cumulative(),
            rewards: self.rewards.breakdown(),
        };

        if let Err(e) = self.reporter.record(&stats) {
            tracing::warn!(episode = stats.episode, "failed to report episode: {e}");
        }
        tracing::info!(
            episode = stats.episode,
            outcome = ?stats.outcome,
            duration = stats.duration,
            steps = stats.steps,
            reward = stats.cumulative_reward,
            "episode finished"
        );

        self.phase = EpisodePhase::Begin;
        Some(stats)
    }

    fn cancel_polling(&mut self) {
        if let Some(token) = self.poll_token.take() {
            self.scheduler.cancel(token);
        }
    }

    fn vehicles_detected(&self) -> [u64; 2] {
        self.semaphores.each_ref().map(SemaphoreState::cars_passed_total)
    }

    /// Reward accrued since the last call, including any terminal reward of
    /// an episode that just ended.
    pub fn take_reward(&mut self) -> f32 {
        self.rewards.take_pending()
    }

    #[must_use]
    pub const fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Index of the current (or just finished) episode. `0` before the
    /// first episode begins.
    #[must_use]
    pub const fn episode_index(&self) -> u64 {
        self.episode_index
    }

    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    #[must_use]
    pub const fn vehicles_spawned(&self) -> u64 {
        self.vehicles_spawned
    }

    #[must_use]
    pub const fn vehicles_arrived(&self) -> u64 {
        self.vehicles_arrived
    }

    /// Accident-terminated episodes over the controller's lifetime.
    #[must_use]
    pub const fn accidents_total(&self) -> u64 {
        self.accidents_total
    }

    /// Whether the decision timer is armed.
    #[must_use]
    pub const fn is_polling(&self) -> bool {
        self.scheduler.is_armed()
    }

    #[must_use]
    pub fn semaphore(&self, approach: Approach) -> &SemaphoreState {
        &self.semaphores[approach.index()]
    }

    #[must_use]
    pub fn semaphores(&self) -> &[SemaphoreState; 2] {
        &self.semaphores
    }

    #[must_use]
    pub fn zone(&self) -> &IntersectionZone {
        &self.zone
    }

    /// Write access for the collision-detection collaborator.
    pub fn zone_mut(&mut self) -> &mut IntersectionZone {
        &mut self.zone
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardAccumulator {
        &self.rewards
    }

    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }
}
