//! Decision cadence.
//!
//! The scheduler is a repeating timer advanced by the simulation clock. Each
//! time the interval elapses it polls the intersection; a poll only asks the
//! policy for an action when at least one vehicle is queued.
//!
//! Arming the timer hands out a [`PollToken`]. The token is the only way to
//! cancel that arming, and a token from an earlier arming can never stop or
//! revive a later one, so no poll survives into the next episode once the
//! controller cancels at teardown.

/// Result of advancing the scheduler by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// The timer is not armed.
    Disarmed,
    /// The interval has not elapsed yet.
    Idle,
    /// The interval elapsed but nothing was queued.
    Skipped,
    /// The interval elapsed with vehicles queued; a decision is due.
    Request,
}

/// Owned handle for one arming of a [`DecisionScheduler`].
#[must_use = "dropping the token leaves no way to cancel the poll timer"]
#[derive(Debug, PartialEq, Eq)]
pub struct PollToken {
    generation: u64,
}

#[derive(Clone, Copy, Debug)]
struct ArmedTimer {
    generation: u64,
    remaining: f32,
}

#[derive(Clone, Debug)]
pub struct DecisionScheduler {
    interval: f32,
    timer: Option<ArmedTimer>,
    generation: u64,
}

impl DecisionScheduler {
    #[must_use]
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            timer: None,
            generation: 0,
        }
    }

    /// Starts a fresh polling cycle, replacing any previous one.
    ///
    /// The first poll happens on the next call to [`advance`](Self::advance).
    pub fn arm(&mut self) -> PollToken {
        self.generation += 1;
        self.timer = Some(ArmedTimer {
            generation: self.generation,
            remaining: 0.0,
        });
        PollToken {
            generation: self.generation,
        }
    }

    /// Stops the polling cycle started by `token`.
    ///
    /// Returns `false` when the token belongs to a superseded arming, in
    /// which case the current cycle keeps running.
    // Taking the token by value spends it; it cannot be used twice.
    #[allow(clippy::needless_pass_by_value)]
    pub fn cancel(&mut self, token: PollToken) -> bool {
        match self.timer {
            Some(timer) if timer.generation == token.generation => {
                self.timer = None;
                true
            }
            _ => false,
        }
    }

    /// Advances the timer by `dt` seconds.
    ///
    /// `has_demand` is evaluated only when a poll is actually due. After a
    /// poll the timer is re-armed for a full interval whether or not a
    /// request fired.
    pub fn advance(&mut self, dt: f32, has_demand: impl FnOnce() -> bool) -> Poll {
        let interval = self.interval;
        let Some(timer) = self.timer.as_mut() else {
            return Poll::Disarmed;
        };
        timer.remaining -= dt;
        if timer.remaining > 0.0 {
            return Poll::Idle;
        }
        timer.remaining = interval;
        if has_demand() {
            Poll::Request
        } else {
            Poll::Skipped
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    #[must_use]
    pub const fn interval(&self) -> f32 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_token_cannot_cancel_new_cycle() {
        let mut scheduler = DecisionScheduler::new(1.0);
        let first = scheduler.arm();
        let second = scheduler.arm();
        assert!(!scheduler.cancel(first));
        assert!(scheduler.is_armed());
        assert!(scheduler.cancel(second));
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn demand_is_not_queried_between_polls() {
        let mut scheduler = DecisionScheduler::new(1.0);
        let _token = scheduler.arm();
        assert_eq!(scheduler.advance(0.1, || true), Poll::Request);
        assert_eq!(
            scheduler.advance(0.1, || panic!("queried while idle")),
            Poll::Idle
        );
    }
}
