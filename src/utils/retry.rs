//! Retry policy for content service calls.
//!
//! Transient failures (5xx, transport faults) are retried with a linear
//! backoff: the delay after attempt N is `base_delay * N`. The policy is
//! a plain value so callers can inject their own budget and tests can run
//! it under paused time instead of wall-clock sleeps.

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempt budget, including the initial attempt.
    pub max_attempts: u32,
    /// Base delay; attempt N waits `base_delay * N` before attempt N+1.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    /// Policy with no retries: one attempt, surfaced as-is.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Calculate the delay after a failed attempt (1-indexed).
    ///
    /// Linear backoff: `base_delay * attempt`, so the wait grows with
    /// each failure without the cliff of an exponential curve.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Check if another attempt remains in the budget after `attempt`
    /// (1-indexed) has failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
