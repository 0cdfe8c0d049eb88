//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use std::time::Duration;

use crate::application::fetch::RetryPolicy;
use crate::infrastructure::config::monitor::MonitorConfig;

/// Monitor config with the default capacities and a short connect timeout.
pub fn monitor() -> MonitorConfig {
    MonitorConfig {
        connect_timeout_ms: 500,
        ..MonitorConfig::default()
    }
}

/// Three attempts with the production one-second step, for paused-clock tests.
pub fn retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1000))
}

/// Minimal TOML config pointing at `base_url`.
pub fn toml(base_url: &str) -> String {
    format!(
        r#"
[backend]
base_url = "{base_url}"

[monitor]
connect_timeout_ms = 500

[fetch]
max_retries = 2
backoff_step_ms = 10

[logging]
level = "warn"
"#
    )
}
