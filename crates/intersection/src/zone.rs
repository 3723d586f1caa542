//! Summary of the critical zone in the middle of the intersection.
//!
//! The zone is written by the collision-detection collaborator and read by
//! the controller. It never reports failures; an episode in which nobody
//! crossed simply produces zero averages.

use serde::{Deserialize, Serialize};

/// Averages finalised at the end of an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneAverages {
    /// Mean seconds a vehicle spent inside the zone.
    pub crossing_time: f32,
    /// Mean seconds a vehicle waited at its semaphore before crossing.
    pub wait_time: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionZone {
    accident_occurred: bool,
    total_vehicles_passed: u64,
    crossing_time_sum: f32,
    wait_time_sum: f32,
    averages: Option<ZoneAverages>,
}

impl IntersectionZone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the accident flag, counters and averages.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records a vehicle that made it through the zone.
    pub fn register_crossing(&mut self, crossing_secs: f32, wait_secs: f32) {
        self.total_vehicles_passed += 1;
        self.crossing_time_sum += crossing_secs;
        self.wait_time_sum += wait_secs;
        self.averages = None;
    }

    /// Latches the accident flag for the rest of the episode.
    pub fn report_accident(&mut self) {
        if !self.accident_occurred {
            tracing::debug!("collision reported in critical zone");
        }
        self.accident_occurred = true;
    }

    #[must_use]
    pub const fn accident_occurred(&self) -> bool {
        self.accident_occurred
    }

    #[must_use]
    pub const fn total_vehicles_passed(&self) -> u64 {
        self.total_vehicles_passed
    }

    /// Finalises the crossing and wait averages.
    pub fn compute_averages(&mut self) -> ZoneAverages {
        let averages = if self.total_vehicles_passed == 0 {
            ZoneAverages::default()
        } else {
            let n = self.total_vehicles_passed as f32;
            ZoneAverages {
                crossing_time: self.crossing_time_sum / n,
                wait_time: self.wait_time_sum / n,
            }
        };
        self.averages = Some(averages);
        averages
    }

    /// Averages from the last [`compute_averages`](Self::compute_averages)
    /// call, or `None` if crossings were registered since.
    #[must_use]
    pub const fn averages(&self) -> Option<ZoneAverages> {
        self.averages
    }
}
