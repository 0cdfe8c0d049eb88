//! Backend connection configuration.

use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, Result};

/// HTTP client configuration for the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for BackendHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}

/// Where the fraud-detection backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of the REST API.
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Path of the realtime WebSocket endpoint.
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
    #[serde(default)]
    pub http: BackendHttpConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_api_path() -> String {
    "/api".into()
}

fn default_ws_path() -> String {
    "/ws/realtime".into()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_path: default_api_path(),
            ws_path: default_ws_path(),
            http: BackendHttpConfig::default(),
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl BackendConfig {
    /// Base URL of the REST API, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an http(s) URL.
    pub fn api_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: format!("expected http or https scheme, got '{}'", base.scheme()),
            }
            .into());
        }
        let joined = join(&self.base_url, &self.api_path);
        Ok(Url::parse(joined.trim_end_matches('/'))?)
    }

    /// URL of the realtime WebSocket, with `http`/`https` mapped to `ws`/`wss`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` has an unsupported scheme.
    pub fn realtime_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        let scheme = match base.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "base_url",
                    reason: format!("unsupported scheme '{other}'"),
                }
                .into())
            }
        };
        let rest = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest);
        let joined = join(&format!("{scheme}://{rest}"), &self.ws_path);
        Ok(Url::parse(&joined)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> BackendConfig {
        BackendConfig {
            base_url: base.into(),
            ..BackendConfig::default()
        }
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let config = BackendConfig::default();
        assert_eq!(config.api_url().unwrap().as_str(), "http://localhost:8000/api");
        assert_eq!(
            config.realtime_url().unwrap().as_str(),
            "ws://localhost:8000/ws/realtime"
        );
    }

    #[test]
    fn https_maps_to_wss() {
        let url = config("https://fraud.example.com/").realtime_url().unwrap();
        assert_eq!(url.as_str(), "wss://fraud.example.com/ws/realtime");
    }

    #[test]
    fn base_path_is_preserved() {
        let config = config("https://gateway.example.com/fraud");
        assert_eq!(
            config.api_url().unwrap().as_str(),
            "https://gateway.example.com/fraud/api"
        );
        assert_eq!(
            config.realtime_url().unwrap().as_str(),
            "wss://gateway.example.com/fraud/ws/realtime"
        );
    }

    #[test]
    fn rejects_unsupported_scheme() {
        assert!(config("ftp://example.com").realtime_url().is_err());
        assert!(config("ws://example.com").api_url().is_err());
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(config("not a url").api_url().is_err());
    }
}
