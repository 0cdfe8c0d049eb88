//! Aggregate figures computed by the backend for the dashboard.

use serde::{Deserialize, Serialize};

/// Dashboard metrics. Every field defaults to zero when the backend omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardMetrics {
    pub total_anomalies: u64,
    pub total_transactions: u64,
    pub avg_risk_score: f64,
    /// Percentage of known fraud caught, 0-100.
    pub detection_rate: f64,
    pub avg_response_time: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    /// Seconds from ingestion to flag.
    pub avg_detection_time: f64,
    pub statistical_latency: f64,
    pub ml_latency: f64,
    pub network_latency: f64,
}
