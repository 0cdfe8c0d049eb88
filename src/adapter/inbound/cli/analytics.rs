//! Handlers for the `analytics` and `realtime` commands.
//!
//! Both print backend JSON whose shape is not fixed, so the human output
//! walks the value: scalars become fields, nested values are shown compact.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::adapter::inbound::cli::command::AnalyticsArgs;
use crate::adapter::inbound::cli::output;
use crate::application::AnalyticsReport;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;

/// Fetch the analytics report (with retries) and print it.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn execute(config: &Config, args: &AnalyticsArgs) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |days: u32| {
        let api = Arc::clone(&api);
        async move { AnalyticsReport::load(api.as_ref(), days).await }
    });
    let report = fetcher.fetch(args.days.max(1)).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "analytics",
            "report": report,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Analytics");
    print_value(&report.analytics);

    output::section(&format!("Anomaly trends ({} days)", report.trend_days));
    let points = report.trend_points();
    if points.is_empty() {
        output::note("No trend data.");
    }
    for point in points {
        output::lines(&compact(point));
    }

    output::section("Detection methods");
    print_value(&report.detection_methods);
    Ok(())
}

/// Fetch one realtime snapshot over REST (with retries) and print it.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn realtime(config: &Config) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |()| {
        let api = Arc::clone(&api);
        async move { api.realtime_data().await }
    });
    let data = fetcher.fetch(()).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "realtime",
            "data": data,
        }));
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Realtime");
    print_value(&data);
    Ok(())
}

fn print_value(value: &Value) {
    match value {
        Value::Object(map) if map.is_empty() => output::note("Nothing reported."),
        Value::Object(map) => {
            for (key, item) in map {
                output::field(&label(key), compact(item));
            }
        }
        Value::Array(items) if items.is_empty() => output::note("Nothing reported."),
        Value::Array(items) => {
            for item in items {
                output::lines(&compact(item));
            }
        }
        Value::Null => output::note("Nothing reported."),
        other => output::lines(&compact(other)),
    }
}

/// Strings print bare, everything else as compact JSON.
fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `avg_risk_score` -> `Avg risk score`.
fn label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
