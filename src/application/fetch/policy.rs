use std::time::Duration;

use crate::infrastructure::config::retry::RetryConfig;

/// Attempt budget and linear backoff of a fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per cycle. Zero is treated as one.
    pub max_retries: u32,
    /// Delay unit; the wait after attempt `k` is `backoff_step * k`.
    pub backoff_step: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: u32, backoff_step: Duration) -> Self {
        Self {
            max_retries,
            backoff_step,
        }
    }

    /// Attempts a cycle may make.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait between attempt `attempt` (1-based) and the next one.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.backoff_step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_three_attempts_one_second_step() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
    }

    #[test]
    fn zero_retries_still_attempts_once() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.attempts(), 1);
    }
}
