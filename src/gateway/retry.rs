use std::time::Duration;

use super::transport::AttemptError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry(Duration),
    GiveUp,
}

/// Bounded retry budget with linear backoff on rate limits.
///
/// Attempts are numbered from 1. A rate-limited attempt `n` waits
/// `base_delay * n`; every other failure waits `base_delay`. Once `n`
/// reaches `max_attempts` the policy gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn decide(&self, attempt: u32, error: &AttemptError) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }

        match error {
            AttemptError::RateLimited => RetryDecision::Retry(self.base_delay * attempt),
            _ => RetryDecision::Retry(self.base_delay),
        }
    }
}
