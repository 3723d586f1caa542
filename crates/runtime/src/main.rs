#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
//! # Intersection Simulator
//!
//! Headless driver for the intersection signal agent. Plays episodes against
//! a seeded traffic stand-in and writes one JSON line per episode to a
//! report file.

mod app;
mod policy;
mod report;
mod traffic;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use intersection::ControllerConfig;
use tracing_subscriber::EnvFilter;

use crate::policy::PolicyKind;
use crate::traffic::TrafficConfig;

#[derive(Parser, Debug)]
#[command(name = "intersection_sim", about = "Run intersection signal episodes headless")]
struct Cli {
    /// Number of episodes to play.
    #[arg(long, default_value_t = 5)]
    episodes: u64,

    /// JSON controller configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Vehicle cap per episode (0 leaves it unset).
    #[arg(long)]
    max_vehicles: Option<u64>,

    /// Seconds between decision polls.
    #[arg(long)]
    decision_interval: Option<f32>,

    /// Semaphore wait timer limit in seconds.
    #[arg(long)]
    wait_timer: Option<f32>,

    /// Vehicles spawned by each of the two generators.
    #[arg(long, default_value_t = 20)]
    vehicles_per_generator: u64,

    /// Simulation tick in seconds.
    #[arg(long, default_value_t = 0.02)]
    dt: f32,

    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = PolicyKind::Queue)]
    policy: PolicyKind,

    /// Directory the report file is written to.
    #[arg(long, default_value = "reports")]
    report_dir: PathBuf,
}

impl Cli {
    fn controller_config(&self) -> Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                ControllerConfig::from_json_str(&json)?
            }
            None => ControllerConfig::default(),
        };
        if let Some(cap) = self.max_vehicles {
            config.max_total_vehicles = cap;
        }
        if let Some(interval) = self.decision_interval {
            config.decision_interval = interval;
        }
        if let Some(limit) = self.wait_timer {
            config.wait_timer_limit = limit;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        anyhow::bail!("--dt must be a positive number of seconds, got {}", cli.dt);
    }

    let options = app::RunOptions {
        episodes: cli.episodes,
        dt: cli.dt,
        policy: cli.policy,
        controller: cli.controller_config()?,
        traffic: TrafficConfig {
            vehicles_per_generator: cli.vehicles_per_generator,
            seed: cli.seed,
            ..TrafficConfig::default()
        },
        report_dir: cli.report_dir,
    };
    app::run(options)?;
    Ok(())
}
