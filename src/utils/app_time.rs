// src/utils/app_time.rs

use std::time::{Duration, Instant};

pub type AppInstant = Instant;

pub fn now() -> AppInstant {
    Instant::now()
}

/// Monotonic time source for the flush timer.
/// The controller only ever asks "how long since X", so tests can swap in a fake.
pub trait Clock {
    fn now(&self) -> AppInstant;

    fn elapsed_since(&self, earlier: AppInstant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> AppInstant {
        (**self).now()
    }
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> AppInstant {
        now()
    }
}

/// A clock that only moves when told to. Used to drive the time trigger in tests.
///
/// With a non-zero `tick`, every reading also advances the clock by `tick`,
/// which lets a test step time forward from inside a running loop.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: AppInstant,
    offset: std::cell::Cell<Duration>,
    tick: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::with_tick(Duration::ZERO)
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self {
            origin: now(),
            offset: std::cell::Cell::new(Duration::ZERO),
            tick,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> AppInstant {
        let reading = self.origin + self.offset.get();
        self.offset.set(self.offset.get() + self.tick);
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.elapsed_since(start), Duration::ZERO);

        clock.advance(Duration::from_millis(1_500));
        assert_eq!(clock.elapsed_since(start), Duration::from_millis(1_500));
    }

    #[test]
    fn ticking_clock_advances_per_reading() {
        let clock = ManualClock::with_tick(Duration::from_secs(1));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::from_secs(1));
        // elapsed_since reads the clock once more
        assert_eq!((&clock).elapsed_since(first), Duration::from_secs(2));
    }
}
