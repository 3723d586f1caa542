//! Rendezvous for the spawn generators.
//!
//! Each generator announces when it is done. The episode may only end on
//! these announcements once every party has arrived.

/// Number of spawn generators feeding the intersection.
pub const GENERATOR_COUNT: u8 = 2;

/// State of a [`GeneratorGate`] after an arrival.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Still waiting for `remaining` generators.
    Waiting { remaining: u8 },
    /// Every generator has arrived.
    Released,
}

/// Counting barrier for a fixed number of parties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorGate {
    parties: u8,
    arrived: u8,
}

impl GeneratorGate {
    #[must_use]
    pub const fn new(parties: u8) -> Self {
        Self { parties, arrived: 0 }
    }

    /// Registers one finished generator.
    pub fn arrive(&mut self) -> GateState {
        self.arrived = self.arrived.saturating_add(1).min(self.parties);
        self.state()
    }

    #[must_use]
    pub const fn state(&self) -> GateState {
        if self.arrived >= self.parties {
            GateState::Released
        } else {
            GateState::Waiting {
                remaining: self.parties - self.arrived,
            }
        }
    }

    pub fn reset(&mut self) {
        self.arrived = 0;
    }
}

impl Default for GeneratorGate {
    fn default() -> Self {
        Self::new(GENERATOR_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_on_last_party() {
        let mut gate = GeneratorGate::default();
        assert_eq!(gate.arrive(), GateState::Waiting { remaining: 1 });
        assert_eq!(gate.arrive(), GateState::Released);
        gate.reset();
        assert_eq!(gate.state(), GateState::Waiting { remaining: 2 });
    }
}
