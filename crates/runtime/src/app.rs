//! # Headless Episode Runner
//!
//! Couples the [`EpisodeController`] with the [`TrafficSim`] collaborator
//! through [`IntersectionEnv`] and plays a fixed number of episodes with a
//! rule-based policy, writing every episode to a JSON-lines report.

use std::path::PathBuf;

use anyhow::Result;
use intersection::{
    ControllerConfig, Env, EpisodeController, EpisodeReporter, HeuristicPolicy, IntersectionEnv,
    Policy, TrafficSource,
};

use crate::policy::PolicyKind;
use crate::report::{JsonLinesReporter, ReportSummary};
use crate::traffic::{TrafficConfig, TrafficSim};

/// Decisions per episode after which the runner gives up on it.
const MAX_DECISIONS_PER_EPISODE: u64 = 100_000;

pub struct RunOptions {
    pub episodes: u64,
    pub dt: f32,
    pub policy: PolicyKind,
    pub controller: ControllerConfig,
    pub traffic: TrafficConfig,
    pub report_dir: PathBuf,
}

/// Plays `options.episodes` episodes and returns the report totals.
///
/// # Errors
///
/// Fails if the report file cannot be created or the controller
/// configuration is invalid.
pub fn run(options: RunOptions) -> Result<ReportSummary> {
    let reporter = JsonLinesReporter::create(&options.report_dir)?;
    tracing::info!(path = %reporter.path().display(), "writing episode report");

    let controller = EpisodeController::new(options.controller, reporter)?;
    let mut env = IntersectionEnv::new(controller, TrafficSim::new(options.traffic), options.dt);
    let mut policy = options.policy.build();

    tracing::info!(
        episodes = options.episodes,
        policy = ?options.policy,
        dt = options.dt,
        "starting headless run"
    );

    for _ in 0..options.episodes {
        env.reset();
        let mut action = HeuristicPolicy::IDLE;
        let mut finished = false;
        for _ in 0..MAX_DECISIONS_PER_EPISODE {
            let (_, _, done) = env.step(action);
            if done {
                finished = true;
                break;
            }
            action = next_action(&env, policy.as_mut());
        }
        if !finished {
            tracing::warn!(
                episode = env.controller().episode_index(),
                in_flight = env.traffic().vehicles_in_flight(),
                "episode did not terminate within the decision budget; abandoning"
            );
        }
    }

    let summary = env.controller().reporter().summary().clone();
    tracing::info!(
        episodes = summary.episodes,
        accidents = summary.accidents,
        accident_rate = summary.accident_rate(),
        mean_reward = summary.mean_reward(),
        vehicles_passed = summary.vehicles_passed,
        "run finished"
    );
    Ok(summary)
}

/// Asks the policy only when the last step stopped on a decision request;
/// otherwise the next step leaves the lights alone.
fn next_action<T: TrafficSource, R: EpisodeReporter>(
    env: &IntersectionEnv<T, R>,
    policy: &mut dyn Policy,
) -> i64 {
    if env.awaiting_decision() {
        policy.decide(&env.controller().observe())
    } else {
        HeuristicPolicy::IDLE
    }
}
