#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Intersection signal agent
//!
//! Decision and reward core for a reinforcement learning agent that runs the
//! lights of a two-approach intersection.
//!
//! The agent watches the North and South semaphores, periodically picks which
//! approach gets the green light, and is scored on throughput against
//! accident and waiting penalties. Vehicle motion, collision geometry and
//! the learning algorithm live outside this crate and talk to it through
//! small interfaces.
//!
//! ## Key Components
//!
//! -   [`SemaphoreState`]: light colour, queue and wait timer of one approach.
//! -   [`IntersectionZone`]: crossing counts, accident flag and averages of
//!     the critical zone.
//! -   [`DecisionScheduler`]: repeating poll timer that asks for a decision
//!     when vehicles are queued.
//! -   [`RewardAccumulator`]: wait penalties, goal bonuses and the terminal
//!     throughput or accident reward.
//! -   [`EpisodeController`]: owns all of the above and runs the episode
//!     lifecycle.
//! -   [`IntersectionEnv`]: `(obs, reward, done)` adapter for learners.
//!
//! ## Usage
//!
//! ```rust
//! use intersection::{
//!     Approach, ControllerConfig, EpisodeController, NullReporter, Observation, TickOutcome,
//! };
//!
//! let config = ControllerConfig::default().with_max_total_vehicles(1);
//! let mut controller = EpisodeController::new(config, NullReporter)?;
//! controller.begin_episode();
//!
//! controller.vehicle_spawned();
//! controller.vehicle_detected(Approach::North);
//! let mut policy = |_: &Observation| 0_i64;
//! controller.tick_with(0.02, &mut policy);
//! assert!(controller.semaphore(Approach::North).is_green());
//!
//! controller.vehicle_released(Approach::North);
//! controller.zone_mut().register_crossing(1.0, 0.5);
//! controller.vehicle_reached_goal();
//! assert!(matches!(controller.tick(0.02), TickOutcome::Ended(_)));
//! # Ok::<(), intersection::ConfigError>(())
//! ```

pub mod config;
pub mod controller;
pub mod env;
pub mod error;
pub mod gate;
pub mod policy;
pub mod reward;
pub mod scheduler;
pub mod semaphore;
pub mod stats;
pub mod zone;

pub use config::{ControllerConfig, RewardConfig, DEFAULT_MAX_TOTAL_VEHICLES};
pub use controller::{EndTrigger, EpisodeController, EpisodePhase, TickOutcome};
pub use env::{Env, IntersectionEnv, TrafficSource};
pub use error::{ConfigError, ReportError};
pub use gate::{GateState, GeneratorGate};
pub use policy::{
    Action, ApproachObservation, HeuristicPolicy, ManualInput, Observation, Policy,
    OBSERVATION_SIZE,
};
pub use reward::{throughput_ratio, RewardAccumulator, RewardBreakdown};
pub use scheduler::{DecisionScheduler, Poll, PollToken};
pub use semaphore::{Approach, SemaphoreState};
pub use stats::{EpisodeOutcome, EpisodeReporter, EpisodeStats, MemoryReporter, NullReporter};
pub use zone::{IntersectionZone, ZoneAverages};
