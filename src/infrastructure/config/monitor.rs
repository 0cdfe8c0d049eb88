//! Live monitor configuration.

use serde::Deserialize;

/// Capacities and timeouts of the live transaction monitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Maximum live transactions kept, newest first.
    #[serde(default = "default_transaction_capacity")]
    pub transaction_capacity: usize,
    /// Maximum alerts kept, newest first.
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,
    /// Time allowed for the realtime channel to open (milliseconds).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_transaction_capacity() -> usize {
    40
}

const fn default_alert_capacity() -> usize {
    10
}

const fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            transaction_capacity: default_transaction_capacity(),
            alert_capacity: default_alert_capacity(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}
