// ABOUTME: Retry budget derived from a wall-clock timeout and a fixed poll interval.
// ABOUTME: Every waiter computes its attempt count through RetryPolicy::iterations.

use std::time::Duration;

/// Fixed-interval bounded retry policy shared by all waiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_timeout: Duration,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_timeout: Duration, interval: Duration) -> Self {
        Self {
            max_timeout,
            interval,
        }
    }

    /// Build a policy from whole-second configuration values.
    pub fn from_secs(max_timeout_secs: u64, check_interval_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(max_timeout_secs),
            Duration::from_secs(check_interval_secs),
        )
    }

    /// Maximum number of attempts: `floor(max_timeout / interval)`.
    ///
    /// A zero interval yields zero attempts rather than an unbounded loop.
    pub fn iterations(&self) -> u32 {
        let interval_ms = self.interval.as_millis();
        if interval_ms == 0 {
            return 0;
        }
        let n = self.max_timeout.as_millis() / interval_ms;
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}
