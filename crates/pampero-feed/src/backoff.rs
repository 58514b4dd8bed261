//! Reconnect backoff state.

use std::time::Duration;

/// Doubling beyond this shift would overflow long before any sane ceiling.
const MAX_SHIFT: u32 = 10;

/// Capped exponential backoff owned by a single connection task.
///
/// Delays are deterministic: `base * 2^failures`, capped at the ceiling, so
/// consecutive failures produce a non-decreasing sequence and a successful
/// connection starts the next failure back at the base.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    ceiling: Duration,
    failures: u32,
}

impl Backoff {
    /// Creates a backoff with the given base delay and ceiling.
    #[must_use]
    pub const fn new(base: Duration, ceiling: Duration) -> Self {
        Self {
            base,
            ceiling,
            failures: 0,
        }
    }

    /// Records a failure and returns the delay before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let shift = self.failures.min(MAX_SHIFT);
        let delay = self.base.saturating_mul(1 << shift).min(self.ceiling);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    /// Resets the failure count after reaching the connected state.
    pub const fn reset(&mut self) {
        self.failures = 0;
    }

    /// Number of consecutive failures recorded since the last reset.
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }
}
