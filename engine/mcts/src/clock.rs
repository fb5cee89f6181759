//! Time source for search deadlines.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time since some fixed origin.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Real wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock that advances by `step` on every read.
///
/// The first read returns zero.
#[derive(Debug)]
pub struct SteppedClock {
    step: Duration,
    reads: AtomicU32,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            reads: AtomicU32::new(0),
        }
    }

    /// A clock that never advances.
    pub fn frozen() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Number of times `now` has been called.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Clock for SteppedClock {
    fn now(&self) -> Duration {
        let n = self.reads.fetch_add(1, Ordering::Relaxed);
        self.step * n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_clock() {
        let clock = SteppedClock::new(Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(250));
        assert_eq!(clock.now(), Duration::from_millis(500));
        assert_eq!(clock.reads(), 3);
    }

    #[test]
    fn test_frozen_clock() {
        let clock = SteppedClock::frozen();
        for _ in 0..10 {
            assert_eq!(clock.now(), Duration::ZERO);
        }
        assert_eq!(clock.reads(), 10);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
