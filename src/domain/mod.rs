//! Backend-agnostic domain types: records, anomalies, metrics and graphs.

mod alert;
mod anomaly;
mod bounded;
mod id;
mod metrics;
mod money;
mod network;
mod page;
mod transaction;

pub use alert::{AlertRecord, Severity};
pub use anomaly::{
    apply_status_update, detection_method_counts, Anomaly, AnomalyStatus, RiskLevel, StatusFilter,
};
pub use bounded::BoundedSequence;
pub use id::{AlertId, AnomalyId, TransactionId};
pub use metrics::DashboardMetrics;
pub use money::{format_usd, Amount};
pub use network::{NetworkEdge, NetworkGraph, NetworkNode, NetworkStats, NetworkView};
pub use page::{AnomalyPage, PageCursor, TransactionPage};
pub use transaction::{parse_timestamp, TransactionRecord};
