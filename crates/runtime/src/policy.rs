//! Rule-based stand-ins for the learned policy.

use clap::ValueEnum;
use intersection::{Action, Approach, Observation, Policy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Green for the longer queue.
    Queue,
    /// Flip the lights on every decision.
    Alternate,
}

impl PolicyKind {
    #[must_use]
    pub fn build(self) -> Box<dyn Policy> {
        match self {
            PolicyKind::Queue => Box::new(LongestQueue),
            PolicyKind::Alternate => Box::new(Alternating::default()),
        }
    }
}

/// Gives the green light to the approach with more queued vehicles. On a
/// tie the current green approach keeps it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongestQueue;

impl Policy for LongestQueue {
    fn decide(&mut self, observation: &Observation) -> i64 {
        let north = observation.approach(Approach::North);
        let south = observation.approach(Approach::South);
        let action = match north.cars_queued.cmp(&south.cars_queued) {
            std::cmp::Ordering::Greater => Action::NorthGreen,
            std::cmp::Ordering::Less => Action::SouthGreen,
            std::cmp::Ordering::Equal if south.is_green => Action::SouthGreen,
            std::cmp::Ordering::Equal => Action::NorthGreen,
        };
        action.to_discrete()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Alternating {
    last: Option<Action>,
}

impl Policy for Alternating {
    fn decide(&mut self, _observation: &Observation) -> i64 {
        let next = match self.last {
            Some(Action::NorthGreen) => Action::SouthGreen,
            _ => Action::NorthGreen,
        };
        self.last = Some(next);
        next.to_discrete()
    }
}
