//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; `FRAUDWATCH_BASE_URL` overrides
//! the backend location.
//!
//! # Example
//!
//! ```no_run
//! use fraudwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("fraudwatch.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::monitor::MonitorConfig;
use super::retry::RetryConfig;
use crate::adapter::outbound::backend::BackendConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `backend.base_url`.
pub const BASE_URL_ENV: &str = "FRAUDWATCH_BASE_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Backend location and HTTP timeouts.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Live monitor capacities and connect timeout.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Retry policy of REST fetches.
    #[serde(default)]
    pub fetch: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is invalid.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with_base_url(content, std::env::var(BASE_URL_ENV).ok())
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn parse_with_base_url(content: &str, base_url: Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            config.backend.base_url = url;
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        self.backend.api_url()?;
        self.backend.realtime_url()?;

        if self.backend.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.backend.http.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.transaction_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "transaction_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.alert_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "alert_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.monitor.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fetch.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_retries",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Install the global tracing subscriber for this configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn parse(toml: &str) -> Result<Config> {
        Config::parse_with_base_url(toml, None)
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse("").unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.http.timeout_ms, 10_000);
        assert_eq!(config.monitor.transaction_capacity, 40);
        assert_eq!(config.monitor.alert_capacity, 10);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.fetch.backoff_step_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [backend]
            base_url = "https://fraud.internal"

            [backend.http]
            timeout_ms = 2500

            [monitor]
            transaction_capacity = 20

            [fetch]
            max_retries = 5
            backoff_step_ms = 250

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://fraud.internal");
        assert_eq!(config.backend.http.timeout_ms, 2500);
        assert_eq!(config.backend.http.connect_timeout_ms, 5000);
        assert_eq!(config.monitor.transaction_capacity, 20);
        assert_eq!(config.monitor.alert_capacity, 10);
        assert_eq!(config.fetch.max_retries, 5);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn base_url_override_wins() {
        let config = Config::parse_with_base_url(
            "[backend]\nbase_url = \"http://from-file:8000\"",
            Some("https://from-env".into()),
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://from-env");

        let config = Config::parse_with_base_url("", Some("  ".into())).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = parse("[monitor]\nalert_capacity = 0");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "alert_capacity",
                ..
            }))
        ));
    }

    #[test]
    fn zero_retries_is_rejected() {
        let result = parse("[fetch]\nmax_retries = 0");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "max_retries",
                ..
            }))
        ));
    }

    #[test]
    fn zero_http_connect_timeout_is_rejected() {
        let result = parse("[backend.http]\nconnect_timeout_ms = 0");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "http.connect_timeout_ms",
                ..
            }))
        ));
    }

    #[test]
    fn empty_base_url_is_missing() {
        let result = parse("[backend]\nbase_url = \"\"");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField { field: "base_url" }))
        ));
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let result = parse("[backend]\nbase_url = \"ftp://example.com\"");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "base_url",
                ..
            }))
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = parse("[backend");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
