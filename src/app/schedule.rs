//! Fixed-interval tick schedule.
//!
//! The poll loops never sleep on their own; they ask the `Ticker` how long
//! until the next tick is due and whether it is due now. The next tick is
//! scheduled one interval after the previous one fired, so a slow tick delays
//! the cadence instead of queueing catch-up ticks.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
    fired: u64,
}

impl Ticker {
    /// A ticker whose first tick is due immediately at `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now,
            fired: 0,
        }
    }

    /// Number of ticks fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Time left until the next tick (zero when already due).
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Fire if due: returns `true` and schedules the next tick from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        self.fired += 1;
        true
    }

    /// Make the next tick due immediately.
    pub fn trigger(&mut self, now: Instant) {
        self.next_due = now;
    }
}
