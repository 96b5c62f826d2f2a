mod state_tests;

use crate::monitor::ticker::Clock;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone)]
pub(super) struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub(super) fn new(start: Instant) -> Self {
        Self(Rc::new(Cell::new(start)))
    }

    pub(super) fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub(super) fn id(s: &str) -> crate::monitor::types::SessionId {
    s.into()
}

pub(super) fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
