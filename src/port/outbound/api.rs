//! Backend REST port.

use async_trait::async_trait;

use crate::domain::{
    AnomalyId, AnomalyPage, AnomalyStatus, DashboardMetrics, NetworkGraph, StatusFilter,
    TransactionPage,
};
use crate::error::Result;

/// Default page size for listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Default look-back window for anomaly trends.
pub const DEFAULT_TREND_DAYS: u32 = 30;

/// Parameters of a transaction listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionQuery {
    pub page: u32,
    pub limit: u32,
    /// Optional backend-side status filter, passed through verbatim.
    pub status: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            status: None,
        }
    }
}

/// Parameters of an anomaly listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnomalyQuery {
    pub page: u32,
    pub limit: u32,
    pub status: StatusFilter,
}

impl AnomalyQuery {
    #[must_use]
    pub const fn new(page: u32, limit: u32, status: StatusFilter) -> Self {
        Self {
            page,
            limit,
            status,
        }
    }
}

impl Default for AnomalyQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT, StatusFilter::All)
    }
}

/// The fraud-detection backend's REST surface.
///
/// Shapes the backend does not pin down (analytics, trends, detection
/// results) are returned as raw JSON.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics>;

    async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionPage>;

    async fn anomalies(&self, query: &AnomalyQuery) -> Result<AnomalyPage>;

    /// Network graph, optionally limited to the last `days` days.
    async fn network_data(&self, days: Option<u32>) -> Result<NetworkGraph>;

    async fn analytics(&self) -> Result<serde_json::Value>;

    async fn anomaly_trends(&self, days: u32) -> Result<serde_json::Value>;

    async fn detection_methods(&self) -> Result<serde_json::Value>;

    /// Polling counterpart of the realtime feed.
    async fn realtime_data(&self) -> Result<serde_json::Value>;

    async fn update_anomaly_status(
        &self,
        id: &AnomalyId,
        status: AnomalyStatus,
    ) -> Result<serde_json::Value>;

    /// Ask the backend to run a detection pass.
    async fn run_detection(&self) -> Result<serde_json::Value>;
}
