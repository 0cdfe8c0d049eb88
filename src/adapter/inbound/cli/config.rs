//! Handlers for the `config` subcommands.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Check that the file exists, parses and passes validation.
///
/// # Errors
///
/// Returns the load or validation error.
pub fn validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "base_url": config.backend.base_url,
        }));
        return Ok(());
    }

    output::success(&format!("{} is valid", path.display()));
    Ok(())
}

/// Print the effective configuration.
///
/// # Errors
///
/// Returns an error if the backend URLs cannot be derived.
pub fn show(path: &Path, config: &Config) -> Result<()> {
    let api_url = config.backend.api_url()?;
    let realtime_url = config.backend.realtime_url()?;
    let source = if path.exists() {
        path.display().to_string()
    } else {
        "defaults".to_string()
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "source": source,
            "backend": {
                "base_url": config.backend.base_url,
                "api_url": api_url.as_str(),
                "realtime_url": realtime_url.as_str(),
                "timeout_ms": config.backend.http.timeout_ms,
                "connect_timeout_ms": config.backend.http.connect_timeout_ms,
            },
            "monitor": {
                "transaction_capacity": config.monitor.transaction_capacity,
                "alert_capacity": config.monitor.alert_capacity,
                "connect_timeout_ms": config.monitor.connect_timeout_ms,
            },
            "fetch": {
                "max_retries": config.fetch.max_retries,
                "backoff_step_ms": config.fetch.backoff_step_ms,
            },
            "logging": {
                "level": config.logging.level,
                "format": config.logging.format,
            },
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Source", &source);

    output::section("Backend");
    output::field("API", output::highlight(api_url));
    output::field("Realtime", output::highlight(realtime_url));
    output::field("Timeout", format!("{} ms", config.backend.http.timeout_ms));

    output::section("Monitor");
    output::field("Transactions kept", config.monitor.transaction_capacity);
    output::field("Alerts kept", config.monitor.alert_capacity);
    output::field(
        "Connect timeout",
        format!("{} ms", config.monitor.connect_timeout_ms),
    );

    output::section("Fetch");
    output::field("Max retries", config.fetch.max_retries);
    output::field("Backoff step", format!("{} ms", config.fetch.backoff_step_ms));

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}
