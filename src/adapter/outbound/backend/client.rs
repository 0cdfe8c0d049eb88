//! Fraud-detection backend REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::dto::request::StatusUpdateRequest;
use super::settings::BackendConfig;
use crate::domain::{
    AnomalyId, AnomalyPage, AnomalyStatus, DashboardMetrics, NetworkGraph, TransactionPage,
};
use crate::error::{ApiError, Result};
use crate::port::{AnomalyQuery, DashboardApi, TransactionQuery};

const DEFAULT_SERVER_MESSAGE: &str = "Server error occurred";

/// HTTP client for the backend REST API.
///
/// Built once from [`BackendConfig`] and shared. Every call goes through a
/// single request path that logs the method and path and normalizes failures
/// into [`ApiError`].
pub struct BackendClient {
    http: HttpClient,
    /// API root, e.g. `http://localhost:8000/api`.
    api_url: String,
}

impl BackendClient {
    /// Create a client for an API root with default timeouts.
    ///
    /// # Arguments
    ///
    /// * `api_url` - API root including the `/api` prefix
    ///   (e.g., `http://localhost:8000/api`)
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let api_url = config.api_url()?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Ok(Self {
            http,
            api_url: api_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// API root this client talks to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn execute<T>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        info!(method = %method, path, "API request");

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            let err = server_error(response).await;
            warn!(
                method = %method,
                path,
                status = status.as_u16(),
                error = %err,
                "API request failed"
            );
            return Err(err.into());
        }

        let parsed = response.json::<T>().await.map_err(classify)?;
        debug!(method = %method, path, status = status.as_u16(), "API response decoded");
        Ok(parsed)
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        self.execute(Method::GET, path, request).await
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(method, path, request).await
    }
}

const NO_QUERY: [(&str, &str); 0] = [];

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ApiError::NoResponse(err.to_string())
    } else {
        ApiError::Unexpected(err.to_string())
    }
}

async fn server_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Server {
        status,
        message: server_message(&body),
    }
}

/// Error text from a failure body: `detail`, then `message`, then a fixed fallback.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message"].iter().find_map(|key| {
                value
                    .get(*key)
                    .and_then(serde_json::Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| DEFAULT_SERVER_MESSAGE.to_string())
}

#[async_trait]
impl DashboardApi for BackendClient {
    async fn dashboard_metrics(&self) -> Result<DashboardMetrics> {
        self.get("/dashboard/metrics", &NO_QUERY).await
    }

    async fn transactions(&self, query: &TransactionQuery) -> Result<TransactionPage> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(status) = &query.status {
            params.push(("status", status.clone()));
        }
        self.get("/transactions", &params).await
    }

    async fn anomalies(&self, query: &AnomalyQuery) -> Result<AnomalyPage> {
        let params = [
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
            ("status", query.status.as_str().to_string()),
        ];
        self.get("/anomalies", &params).await
    }

    async fn network_data(&self, days: Option<u32>) -> Result<NetworkGraph> {
        let params: Vec<(&str, u32)> = days.map(|d| ("days", d)).into_iter().collect();
        let graph: NetworkGraph = self.get("/network/data", &params).await?;
        Ok(graph.normalized())
    }

    async fn analytics(&self) -> Result<serde_json::Value> {
        self.get("/analytics", &NO_QUERY).await
    }

    async fn anomaly_trends(&self, days: u32) -> Result<serde_json::Value> {
        self.get("/analytics/anomaly-trends", &[("days", days)]).await
    }

    async fn detection_methods(&self) -> Result<serde_json::Value> {
        self.get("/analytics/detection-methods", &NO_QUERY).await
    }

    async fn realtime_data(&self) -> Result<serde_json::Value> {
        self.get("/realtime/data", &NO_QUERY).await
    }

    async fn update_anomaly_status(
        &self,
        id: &AnomalyId,
        status: AnomalyStatus,
    ) -> Result<serde_json::Value> {
        let path = format!("/anomalies/{id}/status");
        let body = StatusUpdateRequest::new(status);
        self.send_json(Method::PUT, &path, Some(&body)).await
    }

    async fn run_detection(&self) -> Result<serde_json::Value> {
        self.send_json::<_, ()>(Method::POST, "/detect", None).await
    }
}
