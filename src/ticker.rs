use std::time::{Duration, Instant};

/// Fixed-interval timer polled from the event loop.
///
/// Holds no thread or lock; the loop asks `poll(now)` on every iteration and
/// acts when it returns true.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        // A zero interval would fire on every poll.
        let interval = interval.max(Duration::from_secs(1));
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// True once per elapsed interval. A late poll fires once and schedules
    /// the next tick from `now`, never a burst of catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}
