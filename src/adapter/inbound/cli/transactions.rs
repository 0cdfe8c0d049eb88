//! Handler for the `transactions` command.

use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::TransactionsArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::{format_usd, PageCursor, TransactionPage, TransactionRecord};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;
use crate::port::TransactionQuery;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Anomaly")]
    anomaly: &'static str,
    #[tabled(rename = "Time")]
    time: String,
}

impl From<&TransactionRecord> for TransactionRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            from: record.from_label().to_string(),
            to: record.to_label().to_string(),
            amount: format_usd(record.amount),
            anomaly: if record.is_anomaly { "yes" } else { "" },
            time: record.occurred_at().map_or_else(
                || record.timestamp.clone().unwrap_or_else(|| "-".to_string()),
                |at| at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        }
    }
}

/// List one page of transactions.
///
/// # Errors
///
/// Returns the fetch error once retries are exhausted.
pub async fn execute(config: &Config, args: &TransactionsArgs) -> Result<()> {
    let api = factory::build_api(config)?;
    let fetcher = factory::build_fetcher(config, move |query: TransactionQuery| {
        let api = Arc::clone(&api);
        async move { api.transactions(&query).await }
    });

    let query = TransactionQuery {
        page: args.page.max(1),
        limit: args.limit.max(1),
        status: args
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };
    let page = fetcher.fetch(query.clone()).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "transactions",
            "page": page.page,
            "pages": page.pages,
            "total": page.total,
            "status": query.status,
            "transactions": page.transactions,
        }));
        return Ok(());
    }

    display(&page, &query);
    Ok(())
}

fn display(page: &TransactionPage, query: &TransactionQuery) {
    let cursor = PageCursor::new(page.page, page.pages);

    output::header(env!("CARGO_PKG_VERSION"));
    if let Some(status) = &query.status {
        output::field("Status filter", status);
    }
    output::field("Total", page.total);
    output::field("Page", format!("{} of {}", cursor.page(), cursor.pages()));

    if page.transactions.is_empty() {
        println!();
        output::note("No transactions on this page.");
        return;
    }

    let flagged = page.transactions.iter().filter(|t| t.is_anomaly).count();
    if flagged > 0 {
        output::field("Flagged", output::negative(flagged));
    }

    let rows: Vec<TransactionRow> = page.transactions.iter().map(TransactionRow::from).collect();
    println!();
    output::lines(&Table::new(rows).to_string());

    if cursor.has_next() {
        println!();
        output::note(&format!("More results: --page {}", cursor.next().page()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn row_formats_amount_and_clock() {
        let mut record = TransactionRecord::new("t-7", dec!(1234.5), true);
        record.from_account = Some("ACC-1".into());
        record.timestamp = Some("2024-03-01T14:05:09Z".into());

        let row = TransactionRow::from(&record);

        assert_eq!(row.from, "ACC-1");
        assert_eq!(row.to, "Unknown");
        assert_eq!(row.amount, format_usd(dec!(1234.5)));
        assert_eq!(row.anomaly, "yes");
        assert_eq!(row.time, "2024-03-01 14:05:09");
    }

    #[test]
    fn row_keeps_unparsed_timestamp() {
        let mut record = TransactionRecord::new("t-8", dec!(5), false);
        record.timestamp = Some("pending".into());

        let row = TransactionRow::from(&record);

        assert_eq!(row.anomaly, "");
        assert_eq!(row.time, "pending");
    }
}
