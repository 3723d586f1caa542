//! Per-approach signal state and queue-wait timer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two directions of traffic controlled by the intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Approach {
    North,
    South,
}

impl Approach {
    /// Both approaches in observation order.
    pub const ALL: [Approach; 2] = [Approach::North, Approach::South];

    /// Position of this approach in observation and storage order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::South => 1,
        }
    }

    /// The approach facing this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Approach::North => Approach::South,
            Approach::South => Approach::North,
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approach::North => f.write_str("north"),
            Approach::South => f.write_str("south"),
        }
    }
}

/// Light colour, queue and wait timer for a single approach.
///
/// The wait timer counts down while vehicles are held at a red light. The
/// countdown is scaled by the queue length, so a long queue runs out of
/// patience faster than a single car.
///
/// A semaphore does not know about its neighbour. Keeping at most one
/// approach green is the controller's job.
#[derive(Clone, Debug, PartialEq)]
pub struct SemaphoreState {
    approach: Approach,
    is_green: bool,
    cars_queued: u32,
    cars_passed_total: u64,
    wait_timer: f32,
    wait_timer_limit: f32,
}

impl SemaphoreState {
    /// Creates a red semaphore with an empty queue and a full wait timer.
    #[must_use]
    pub fn new(approach: Approach, wait_timer_limit: f32) -> Self {
        Self {
            approach,
            is_green: false,
            cars_queued: 0,
            cars_passed_total: 0,
            wait_timer: wait_timer_limit,
            wait_timer_limit,
        }
    }

    /// Restores the start-of-episode state.
    pub fn reset(&mut self) {
        self.is_green = false;
        self.cars_queued = 0;
        self.cars_passed_total = 0;
        self.wait_timer = self.wait_timer_limit;
    }

    /// Advances the wait timer by `dt` seconds.
    ///
    /// A red light with a non-empty queue drains the timer by
    /// `dt * cars_queued`; any other state refills it to the limit. Returns
    /// `true` only on the tick where the timer drops below zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        let before = self.wait_timer;
        if !self.is_green && self.cars_queued > 0 {
            self.wait_timer -= dt * self.cars_queued as f32;
        } else {
            self.wait_timer = self.wait_timer_limit;
        }
        before >= 0.0 && self.wait_timer < 0.0
    }

    pub fn set_green(&mut self, green: bool) {
        self.is_green = green;
    }

    /// A vehicle reached this approach's detector and joined the queue.
    pub fn vehicle_detected(&mut self) {
        self.cars_queued += 1;
        self.cars_passed_total += 1;
    }

    /// The vehicle at the head of the queue left the detector.
    pub fn vehicle_released(&mut self) {
        self.cars_queued = self.cars_queued.saturating_sub(1);
    }

    #[must_use]
    pub const fn approach(&self) -> Approach {
        self.approach
    }

    #[must_use]
    pub const fn is_green(&self) -> bool {
        self.is_green
    }

    #[must_use]
    pub const fn cars_queued(&self) -> u32 {
        self.cars_queued
    }

    /// Vehicles detected at this approach since the episode began.
    #[must_use]
    pub const fn cars_passed_total(&self) -> u64 {
        self.cars_passed_total
    }

    #[must_use]
    pub const fn wait_timer(&self) -> f32 {
        self.wait_timer
    }

    #[must_use]
    pub const fn wait_timer_limit(&self) -> f32 {
        self.wait_timer_limit
    }

    /// Whether the queue has waited long enough to be penalised.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.wait_timer < 0.0
    }
}
