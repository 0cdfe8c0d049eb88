//! Handler for the `metrics` command.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::DashboardMetrics;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;

/// Fetch dashboard metrics (with retries) and print them.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn execute(config: &Config) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |()| {
        let api = Arc::clone(&api);
        async move { api.dashboard_metrics().await }
    });
    let metrics = fetcher.fetch(()).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "metrics",
            "metrics": metrics,
        }));
        return Ok(());
    }

    display(&metrics);
    Ok(())
}

fn display(metrics: &DashboardMetrics) {
    output::header(env!("CARGO_PKG_VERSION"));

    output::section("Volume");
    output::field("Transactions", metrics.total_transactions);
    output::field("Anomalies", output::negative(metrics.total_anomalies));
    output::field("Avg risk score", format!("{:.1}", metrics.avg_risk_score));

    output::section("Detection");
    output::field(
        "Detection rate",
        output::positive(format!("{:.1}%", metrics.detection_rate)),
    );
    output::field("Precision", format!("{:.3}", metrics.precision));
    output::field("Recall", format!("{:.3}", metrics.recall));
    output::field("F1 score", format!("{:.3}", metrics.f1_score));
    output::field(
        "False positive rate",
        format!("{:.1}%", metrics.false_positive_rate),
    );

    output::section("Latency");
    output::field(
        "Avg detection time",
        format!("{:.2} s", metrics.avg_detection_time),
    );
    output::field(
        "Avg response time",
        format!("{:.0} ms", metrics.avg_response_time),
    );
    output::field(
        "Statistical",
        format!("{:.0} ms", metrics.statistical_latency),
    );
    output::field("ML", format!("{:.0} ms", metrics.ml_latency));
    output::field("Network", format!("{:.0} ms", metrics.network_latency));
}
