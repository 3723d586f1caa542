//! End-of-episode records and the reporting seam.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::reward::RewardBreakdown;
use crate::zone::ZoneAverages;

/// Why an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The critical zone reported a collision.
    Accident,
    /// Every capped vehicle spawned and reached its goal.
    CapReached,
    /// Both spawn generators reported completion.
    GeneratorsFinished,
}

impl EpisodeOutcome {
    #[must_use]
    pub const fn is_accident(self) -> bool {
        matches!(self, EpisodeOutcome::Accident)
    }
}

/// Record of one finished episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// 1-based, increasing for the lifetime of the controller.
    pub episode: u64,
    pub outcome: EpisodeOutcome,
    pub accident: bool,
    /// Elapsed simulated seconds.
    pub duration: f32,
    /// Ticks simulated during the episode.
    pub steps: u64,
    pub decisions: u64,
    pub vehicles_spawned: u64,
    pub vehicles_arrived: u64,
    pub vehicles_passed: u64,
    /// Vehicles detected per approach, North first.
    pub vehicles_detected: [u64; 2],
    pub averages: ZoneAverages,
    pub cumulative_reward: f32,
    pub rewards: RewardBreakdown,
}

/// Receives each finished episode record.
///
/// The controller logs and otherwise ignores reporter errors so a broken
/// sink never interrupts training.
pub trait EpisodeReporter {
    /// # Errors
    ///
    /// Implementations return [`ReportError`] when the record could not be
    /// persisted.
    fn record(&mut self, stats: &EpisodeStats) -> Result<(), ReportError>;
}

/// Keeps records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryReporter {
    records: Vec<EpisodeStats>,
}

impl MemoryReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[EpisodeStats] {
        &self.records
    }
}

impl EpisodeReporter for MemoryReporter {
    fn record(&mut self, stats: &EpisodeStats) -> Result<(), ReportError> {
        self.records.push(stats.clone());
        Ok(())
    }
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl EpisodeReporter for NullReporter {
    fn record(&mut self, _stats: &EpisodeStats) -> Result<(), ReportError> {
        Ok(())
    }
}
