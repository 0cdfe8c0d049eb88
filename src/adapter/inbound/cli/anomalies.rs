//! Handlers for the `anomalies` and `set-status` commands.

use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{AnomaliesArgs, SetStatusArgs};
use crate::adapter::inbound::cli::output;
use crate::application::AnomalyBoard;
use crate::domain::{Anomaly, AnomalyId, RiskLevel};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;
use crate::port::AnomalyQuery;

#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Transaction")]
    transaction: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Detected")]
    detected: String,
}

impl From<&Anomaly> for AnomalyRow {
    fn from(anomaly: &Anomaly) -> Self {
        Self {
            id: anomaly.id.to_string(),
            transaction: anomaly
                .transaction_id
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            score: format!("{:.1}", anomaly.anomaly_score),
            risk: anomaly.risk_level().to_string(),
            status: anomaly.status.to_string(),
            method: anomaly
                .detection_method
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            detected: anomaly.created_at.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// List one page of anomalies.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn list(config: &Config, args: &AnomaliesArgs) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |query: AnomalyQuery| {
        let api = Arc::clone(&api);
        async move { api.anomalies(&query).await }
    });

    let query = AnomalyQuery::new(args.page.max(1), args.limit.max(1), args.status);
    let page = fetcher.fetch(query).await?;
    let board = AnomalyBoard::with_page(query, page);

    if output::is_json() {
        let cursor = board.cursor();
        output::json_output(json!({
            "command": "anomalies",
            "page": cursor.page(),
            "pages": cursor.pages(),
            "total": board.total(),
            "status": query.status.as_str(),
            "anomalies": board.visible(),
            "detection_methods": method_counts_json(&board),
        }));
        return Ok(());
    }

    display(&board);
    Ok(())
}

fn method_counts_json(board: &AnomalyBoard) -> serde_json::Value {
    board
        .method_counts()
        .into_iter()
        .map(|(method, count)| (method, json!(count)))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn display(board: &AnomalyBoard) {
    let cursor = board.cursor();
    let visible = board.visible();

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Status filter", board.query().status);
    output::field("Total", board.total());
    output::field("Page", format!("{} of {}", cursor.page(), cursor.pages()));

    if visible.is_empty() {
        println!();
        output::note("No anomalies match this filter.");
        return;
    }

    let critical = visible
        .iter()
        .filter(|a| a.risk_level() == RiskLevel::Critical)
        .count();
    if critical > 0 {
        output::field("Critical", output::negative(critical));
    }

    let rows: Vec<AnomalyRow> = visible.into_iter().map(AnomalyRow::from).collect();
    let table = Table::new(rows).to_string();
    println!();
    output::lines(&table);

    output::section("Detection methods");
    for (method, count) in board.method_counts() {
        output::field(&method, count);
    }

    if cursor.has_next() {
        println!();
        output::note(&format!("More results: --page {}", cursor.next().page()));
    }
}

/// Change the status of one anomaly. Not retried.
///
/// # Errors
///
/// Returns the backend error.
pub async fn set_status(config: &Config, args: &SetStatusArgs) -> Result<()> {
    let api = factory::build_api(config)?;
    let id = AnomalyId::new(args.id.trim());
    let mut board = AnomalyBoard::default();
    board.update_status(api.as_ref(), &id, args.status).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "set-status",
            "id": id.as_str(),
            "status": args.status.as_str(),
        }));
        return Ok(());
    }

    output::success(&format!(
        "Anomaly {} marked {}",
        output::highlight(&id),
        args.status
    ));
    Ok(())
}
