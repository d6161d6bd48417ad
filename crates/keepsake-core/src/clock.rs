//! Clock abstraction for determinism.

use std::time::{Duration, Instant};

/// Abstraction over a monotonic clock.
///
/// `now` is the time elapsed since the clock's own origin. Components only
/// ever compare readings from the same clock, so the origin is arbitrary.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic reading.
    fn now(&self) -> Duration;
}

/// Production clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
    scale: f64,
}

impl SystemClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self::scaled(1.0)
    }

    /// Creates a clock that runs `scale` times faster than real time.
    ///
    /// Non-positive or non-finite scales fall back to real time.
    #[must_use]
    pub fn scaled(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            origin: Instant::now(),
            scale,
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
        self.origin.elapsed().mul_f64(self.scale)
    }
}

/// A one-shot wall-clock deadline.
///
/// Timers are armed against a [`Clock`] reading and polled on every tick;
/// dropping or disarming one is how pending work is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    due_at: Duration,
}

impl Deadline {
    /// Arms a deadline `delay` after `now`.
    #[must_use]
    pub fn after(now: Duration, delay: Duration) -> Self {
        Self {
            due_at: now.saturating_add(delay),
        }
    }

    /// The monotonic reading at which the deadline fires.
    #[must_use]
    pub fn due_at(&self) -> Duration {
        self.due_at
    }

    /// Whether the deadline has been reached at `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.due_at
    }

    /// Time left until the deadline, zero once it is due.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.due_at.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_is_due_exactly_at_delay() {
        let deadline = Deadline::after(Duration::from_secs(2), Duration::from_millis(1500));

        assert!(!deadline.is_due(Duration::from_millis(3499)));
        assert!(deadline.is_due(Duration::from_millis(3500)));
        assert_eq!(deadline.remaining(Duration::from_secs(3)), Duration::from_millis(500));
        assert_eq!(deadline.remaining(Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_scaled_clock_rejects_invalid_scale() {
        let clock = SystemClock::scaled(f64::NAN);
        assert!((clock.scale - 1.0).abs() < f64::EPSILON);
    }
}
