use std::time::{Duration, Instant};

/// Source of the current time for the driver loop.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A self-checked timer polled from the read loop.
///
/// When a deadline is missed, the next one is scheduled from the time of the
/// check, not from the missed deadline. Under load the cadence drifts instead
/// of replaying a backlog of runs.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns true at most once per deadline and reschedules.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}
