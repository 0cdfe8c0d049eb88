//! Fetch retry configuration.

use std::time::Duration;

use serde::Deserialize;

/// Retry settings for [`RetryingFetcher`](crate::application::fetch::RetryingFetcher).
///
/// The delay before retry `k + 1` is `backoff_step_ms * k` (linear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per fetch cycle, including the first.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit in milliseconds.
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_step_ms() -> u64 {
    1000
}

impl RetryConfig {
    #[must_use]
    pub const fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_step_ms: default_backoff_step_ms(),
        }
    }
}
