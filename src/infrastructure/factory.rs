//! Component factory functions.
//!
//! Builds the backend adapters and application services from [`Config`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::backend::{BackendClient, WebSocketFeedStream};
use crate::application::fetch::{RetryPolicy, RetryingFetcher};
use crate::application::monitor::{MonitorController, StreamFactory};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{DashboardApi, RealtimeStream};

/// Build the shared REST client.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid.
pub fn build_api(config: &Config) -> Result<Arc<dyn DashboardApi>> {
    let client = BackendClient::from_config(&config.backend)?;
    info!(api = client.api_url(), "Backend client ready");
    Ok(Arc::new(client))
}

/// Build a factory producing one WebSocket feed stream per session.
///
/// # Errors
///
/// Returns an error if the realtime URL cannot be derived.
pub fn build_stream_factory(config: &Config) -> Result<StreamFactory> {
    let url = config.backend.realtime_url()?.to_string();
    Ok(Arc::new(move || {
        Box::new(WebSocketFeedStream::new(url.clone())) as Box<dyn RealtimeStream>
    }))
}

/// Build the live monitor controller.
///
/// # Errors
///
/// Returns an error if the realtime URL cannot be derived.
pub fn build_monitor(config: &Config) -> Result<MonitorController> {
    let factory = build_stream_factory(config)?;
    Ok(MonitorController::new(factory, config.monitor.clone()))
}

/// Build a retrying fetcher around one backend call.
pub fn build_fetcher<K, T, F, Fut>(config: &Config, operation: F) -> RetryingFetcher<K, T>
where
    K: PartialEq + Clone + Send + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    RetryingFetcher::new(RetryPolicy::from(&config.fetch), operation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_factory_targets_realtime_endpoint() {
        let config = Config::default();
        let factory = build_stream_factory(&config).unwrap();

        let stream = factory();
        assert_eq!(stream.endpoint(), "ws://localhost:8000/ws/realtime");
    }

    #[test]
    fn fetcher_uses_configured_policy() {
        let mut config = Config::default();
        config.fetch.max_retries = 5;

        let fetcher = build_fetcher(&config, |()| async { Ok(1u8) });

        assert_eq!(fetcher.policy().attempts(), 5);
    }
}
