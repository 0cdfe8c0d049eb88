//! Analytics overview: the backend's aggregate views fetched together.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::port::DashboardApi;

/// Aggregate analytics, anomaly trends and detection method breakdown.
///
/// The backend does not pin these shapes down, so they stay raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub trend_days: u32,
    pub analytics: Value,
    pub trends: Value,
    pub detection_methods: Value,
}

impl AnalyticsReport {
    /// Fetch the three views concurrently.
    ///
    /// # Arguments
    ///
    /// * `api` - Backend to query
    /// * `trend_days` - Look-back window for the anomaly trend series
    ///
    /// # Errors
    ///
    /// Returns the first backend error; partial results are discarded.
    pub async fn load(api: &dyn DashboardApi, trend_days: u32) -> Result<Self> {
        let (analytics, trends, detection_methods) = tokio::try_join!(
            api.analytics(),
            api.anomaly_trends(trend_days),
            api.detection_methods(),
        )?;
        debug!(trend_days, "Analytics report loaded");

        Ok(Self {
            trend_days,
            analytics,
            trends,
            detection_methods,
        })
    }

    /// Trend points, whether sent bare or wrapped in `{"trends": [...]}`.
    #[must_use]
    pub fn trend_points(&self) -> &[Value] {
        match &self.trends {
            Value::Array(points) => points.as_slice(),
            Value::Object(obj) => obj
                .get("trends")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        }
    }
}
