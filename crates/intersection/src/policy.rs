//! Observation and action contract with the external policy.

use serde::{Deserialize, Serialize};

use crate::semaphore::{Approach, SemaphoreState};

/// Number of scalars in a flattened [`Observation`].
pub const OBSERVATION_SIZE: usize = 6;

/// What the policy sees of a single approach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproachObservation {
    pub is_green: bool,
    pub cars_queued: u32,
    pub cars_passed_total: u64,
}

impl From<&SemaphoreState> for ApproachObservation {
    fn from(semaphore: &SemaphoreState) -> Self {
        Self {
            is_green: semaphore.is_green(),
            cars_queued: semaphore.cars_queued(),
            cars_passed_total: semaphore.cars_passed_total(),
        }
    }
}

/// Snapshot handed to the policy on every decision request, North first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub approaches: [ApproachObservation; 2],
}

impl Observation {
    #[must_use]
    pub fn approach(&self, approach: Approach) -> &ApproachObservation {
        &self.approaches[approach.index()]
    }

    /// Flattens to `[green, queued, passed]` per approach.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.approaches
            .iter()
            .flat_map(|a| {
                [
                    if a.is_green { 1.0 } else { 0.0 },
                    a.cars_queued as f32,
                    a.cars_passed_total as f32,
                ]
            })
            .collect()
    }
}

/// Discrete action accepted by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// North green, South red.
    NorthGreen,
    /// South green, North red.
    SouthGreen,
}

impl Action {
    /// Maps a raw discrete value to an action. Anything outside `{0, 1}`
    /// has no meaning and yields `None`.
    #[must_use]
    pub const fn from_discrete(value: i64) -> Option<Self> {
        match value {
            0 => Some(Action::NorthGreen),
            1 => Some(Action::SouthGreen),
            _ => None,
        }
    }

    #[must_use]
    pub const fn to_discrete(self) -> i64 {
        match self {
            Action::NorthGreen => 0,
            Action::SouthGreen => 1,
        }
    }

    /// The approach this action turns green.
    #[must_use]
    pub const fn green_approach(self) -> Approach {
        match self {
            Action::NorthGreen => Approach::North,
            Action::SouthGreen => Approach::South,
        }
    }
}

/// Answers decision requests. Implemented by the learning side.
pub trait Policy {
    /// Returns a raw discrete action for `observation`. Values other than
    /// `0` and `1` leave the lights unchanged.
    fn decide(&mut self, observation: &Observation) -> i64;
}

impl<F> Policy for F
where
    F: FnMut(&Observation) -> i64,
{
    fn decide(&mut self, observation: &Observation) -> i64 {
        self(observation)
    }
}

/// Manual override keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManualInput {
    /// Give North the green light.
    Up,
    /// Give South the green light.
    Down,
}

/// Keyboard-style fallback that bypasses the learned policy.
///
/// A key press is consumed by the next decision request. Without a fresh
/// press the policy answers [`HeuristicPolicy::IDLE`], which the controller
/// ignores.
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    pressed: Option<ManualInput>,
}

impl HeuristicPolicy {
    /// Raw value returned when no key was pressed.
    pub const IDLE: i64 = -1;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, input: ManualInput) {
        self.pressed = Some(input);
    }
}

impl Policy for HeuristicPolicy {
    fn decide(&mut self, _observation: &Observation) -> i64 {
        match self.pressed.take() {
            Some(ManualInput::Up) => Action::NorthGreen.to_discrete(),
            Some(ManualInput::Down) => Action::SouthGreen.to_discrete(),
            None => Self::IDLE,
        }
    }
}
