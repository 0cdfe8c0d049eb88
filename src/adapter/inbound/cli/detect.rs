//! Handler for the `detect` command.

use serde_json::json;
use tracing::info;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;

/// Trigger a detection pass. Not retried: the backend may already have
/// started one when a response goes missing.
///
/// # Errors
///
/// Returns the backend error.
pub async fn execute(config: &Config) -> Result<()> {
    let api = factory::build_api(config)?;
    let result = api.run_detection().await?;
    info!("Detection pass requested");

    if output::is_json() {
        output::json_output(json!({
            "command": "detect",
            "result": result,
        }));
        return Ok(());
    }

    output::success("Detection pass started");
    if let Some(fields) = result.as_object() {
        for (key, value) in fields {
            let rendered = value
                .as_str()
                .map_or_else(|| value.to_string(), ToOwned::to_owned);
            output::field(key, rendered);
        }
    }
    Ok(())
}
