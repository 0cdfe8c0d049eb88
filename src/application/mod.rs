//! Application services (use cases).
//!
//! These services coordinate domain logic with the outbound ports.

pub mod analytics;
pub mod anomalies;
pub mod fetch;
pub mod monitor;

pub use analytics::AnalyticsReport;
pub use anomalies::AnomalyBoard;
pub use fetch::{FetchError, FetchState, RetryPolicy, RetryingFetcher};
pub use monitor::{
    ConnectionState, DisconnectCause, LiveMonitor, MonitorController, MonitorSnapshot,
    MonitorStats, StreamFactory,
};
