//! JSON-lines episode report.
//!
//! One file is created per run, named after the start time. Every finished
//! episode is appended as a single JSON object and flushed immediately so a
//! crashed run still leaves a readable report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use intersection::{EpisodeReporter, EpisodeStats, ReportError};
use serde::Serialize;

/// Totals across all reported episodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub episodes: u64,
    pub accidents: u64,
    pub total_reward: f64,
    pub total_duration: f64,
    pub vehicles_passed: u64,
}

impl ReportSummary {
    fn add(&mut self, stats: &EpisodeStats) {
        self.episodes += 1;
        self.accidents += u64::from(stats.accident);
        self.total_reward += f64::from(stats.cumulative_reward);
        self.total_duration += f64::from(stats.duration);
        self.vehicles_passed += stats.vehicles_passed;
    }

    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    #[must_use]
    pub fn accident_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.accidents as f64 / self.episodes as f64
        }
    }
}

pub struct JsonLinesReporter {
    path: PathBuf,
    writer: BufWriter<File>,
    summary: ReportSummary,
}

impl JsonLinesReporter {
    /// Creates `dir` if needed and opens a fresh report file inside it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the directory or file cannot be
    /// created.
    pub fn create(dir: &Path) -> Result<Self, ReportError> {
        fs::create_dir_all(dir)?;
        let name = format!("report_{}.jsonl", Local::now().format("%Y%m%d_%H%M%S_%3f"));
        let path = dir.join(name);
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self {
            path,
            writer,
            summary: ReportSummary::default(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }
}

impl EpisodeReporter for JsonLinesReporter {
    fn record(&mut self, stats: &EpisodeStats) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.writer, stats)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.summary.add(stats);
        Ok(())
    }
}
