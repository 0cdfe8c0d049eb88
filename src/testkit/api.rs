//! Scripted [`DashboardApi`] for testing fetchers and boards.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{
    AnomalyId, AnomalyPage, AnomalyStatus, DashboardMetrics, NetworkGraph, TransactionPage,
};
use crate::error::{ApiError, Result};
use crate::port::{AnomalyQuery, DashboardApi, TransactionQuery};

/// A backend stand-in with canned responses.
///
/// Anomaly listings pop from a scripted queue (falling back to the configured
/// page); status updates and analytics succeed unless a failure is queued.
/// Every call is counted, and listing parameters are recorded.
#[derive(Default)]
pub struct ScriptedApi {
    metrics: DashboardMetrics,
    anomaly_page: AnomalyPage,
    transaction_page: TransactionPage,
    network: NetworkGraph,
    analytics: serde_json::Value,
    detection_methods: serde_json::Value,
    realtime: serde_json::Value,
    anomaly_results: Mutex<VecDeque<Result<AnomalyPage>>>,
    update_failures: Mutex<VecDeque<ApiError>>,
    analytics_failures: Mutex<VecDeque<ApiError>>,
    updates: Mutex<Vec<(AnomalyId, AnomalyStatus)>>,
    transaction_queries: Mutex<Vec<TransactionQuery>>,
    trend_requests: Mutex<Vec<u32>>,
    calls: Arc<AtomicU32>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(mut self, metrics: DashboardMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_anomaly_page(mut self, page: AnomalyPage) -> Self {
        self.anomaly_page = page;
        self
    }

    pub fn with_network(mut self, graph: NetworkGraph) -> Self {
        self.network = graph;
        self
    }

    pub fn with_transaction_page(mut self, page: TransactionPage) -> Self {
        self.transaction_page = page;
        self
    }

    pub fn with_analytics(mut self, analytics: serde_json::Value) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_detection_methods(mut self, methods: serde_json::Value) -> Self {
        self.detection_methods = methods;
        self
    }

    pub fn with_realtime(mut self, data: serde_json::Value) -> Self {
        self.realtime = data;
        self
    }

    /// Queue results for successive `anomalies` calls.
    pub fn with_anomaly_results(self, results: Vec<Result<AnomalyPage>>) -> Self {
        *self.anomaly_results.lock().unwrap() = results.into();
        self
    }

    /// Make the next status update fail.
    pub fn fail_next_update(&self, error: ApiError) {
        self.update_failures.lock().unwrap().push_back(error);
    }

    /// Make the next `analytics` call fail.
    pub fn fail_next_analytics(&self, error: ApiError) {
        self.analytics_failures.lock().unwrap().push_back(error);
    }

    /// Transaction listings requested so far.
    pub fn transaction_queries(&self) -> Vec<TransactionQuery> {
        self.transaction_queries.lock().unwrap().clone()
    }

    /// Look-back windows of the trend requests so far.
    pub fn trend_requests(&self) -> Vec<u32> {
        self.trend_requests.lock().unwrap().clone()
    }

    /// Successful status updates sent so far.
    pub fn updates(&self) -> Vec<(AnomalyId, AnomalyStatus)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DashboardApi for ScriptedApi {
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        self.record();
        Ok(self.metrics.clone())
    }

    async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        self.record();
        self.transaction_queries.lock().unwrap().push(query.clone());
        Ok(self.transaction_page.clone())
    }

    async fn anomalies(&self, _query: &AnomalyQuery) -> Result<AnomalyPage> {
        self.record();
        let scripted = self.anomaly_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(self.anomaly_page.clone()))
    }

    async fn network_data(&self, _days: Option<u32>) -> Result<NetworkGraph> {
        self.record();
        Ok(self.network.clone())
    }

    async fn analytics(&self) -> Result<serde_json::Value> {
        self.record();
        if let Some(err) = self.analytics_failures.lock().unwrap().pop_front() {
            return Err(err.into());
        }
        Ok(self.analytics.clone())
    }

    async fn anomaly_trends(&self, days: u32) -> Result<serde_json::Value> {
        self.record();
        self.trend_requests.lock().unwrap().push(days);
        Ok(json!({ "days": days, "trends": [] }))
    }

    async fn detection_methods(&self) -> Result<serde_json::Value> {
        self.record();
        Ok(self.detection_methods.clone())
    }

    async fn realtime_data(&self) -> Result<serde_json::Value> {
        self.record();
        Ok(self.realtime.clone())
    }

    async fn update_anomaly_status(
        &self,
        id: &AnomalyId,
        status: AnomalyStatus,
    ) -> Result<serde_json::Value> {
        self.record();
        if let Some(err) = self.update_failures.lock().unwrap().pop_front() {
            return Err(err.into());
        }
        self.updates.lock().unwrap().push((id.clone(), status));
        Ok(json!({ "id": id, "status": status }))
    }

    async fn run_detection(&self) -> Result<serde_json::Value> {
        self.record();
        Ok(json!({ "anomalies_detected": 0 }))
    }
}
