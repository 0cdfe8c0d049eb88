//! Handler for the `monitor` command.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::MonitorArgs;
use crate::adapter::inbound::cli::output;
use crate::application::monitor::{ConnectionState, MonitorSnapshot, MonitorStats};
use crate::domain::{format_usd, AlertId, AlertRecord, TransactionId, TransactionRecord};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::factory;

/// Tracks what has already been printed so each snapshot only prints the
/// records that arrived since the previous one.
#[derive(Debug, Default)]
struct FeedPrinter {
    state: ConnectionState,
    newest_transaction: Option<TransactionId>,
    newest_alert: Option<AlertId>,
}

impl FeedPrinter {
    fn print(&mut self, snapshot: &MonitorSnapshot) {
        if snapshot.state != self.state {
            self.state = snapshot.state;
            print_state(snapshot.state);
        }

        let fresh = fresh_prefix(&snapshot.transactions, self.newest_transaction.as_ref(), |t| {
            &t.id
        });
        for record in fresh.iter().rev() {
            print_transaction(record);
        }
        if let Some(first) = snapshot.transactions.first() {
            self.newest_transaction = Some(first.id.clone());
        }

        let fresh = fresh_prefix(&snapshot.alerts, self.newest_alert.as_ref(), |a| &a.id);
        for record in fresh.iter().rev() {
            print_alert(record);
        }
        if let Some(first) = snapshot.alerts.first() {
            self.newest_alert = Some(first.id.clone());
        }
    }
}

/// Records ahead of `newest` in a newest-first list. Everything is fresh when
/// `newest` is unknown or no longer present.
fn fresh_prefix<'a, T, I: PartialEq>(
    items: &'a [T],
    newest: Option<&I>,
    id: impl Fn(&T) -> &I,
) -> &'a [T] {
    let Some(newest) = newest else {
        return items;
    };
    match items.iter().position(|item| id(item) == newest) {
        Some(index) => &items[..index],
        None => items,
    }
}

fn print_state(state: ConnectionState) {
    match state {
        ConnectionState::Connecting => output::note("Connecting to realtime feed..."),
        ConnectionState::Connected => output::success("Live monitoring active"),
        ConnectionState::Disconnected | ConnectionState::Closed => {}
    }
}

/// Feed clock: `HH:MM:SS` UTC when the timestamp parses, the raw value otherwise.
fn clock(parsed: Option<DateTime<Utc>>, raw: Option<&str>) -> String {
    match parsed {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => raw.unwrap_or("-").to_string(),
    }
}

fn print_transaction(record: &TransactionRecord) {
    let timestamp = clock(record.occurred_at(), record.timestamp.as_deref());
    let amount = format_usd(record.amount);
    let route = output::muted(format!("{} -> {}", record.from_label(), record.to_label()));
    let kind = if record.is_anomaly {
        "anomaly"
    } else {
        "transaction"
    };
    let amount = if record.is_anomaly {
        output::negative(amount)
    } else {
        output::highlight(amount)
    };
    output::feed(
        kind,
        &timestamp,
        &format!("{} {amount} {route}", record.id),
        json!(record),
    );
}

fn print_alert(record: &AlertRecord) {
    let timestamp = clock(record.raised_at(), record.timestamp.as_deref());
    let message = if record.is_critical() {
        output::negative(&record.message)
    } else {
        record.message.clone()
    };
    output::feed(
        "alert",
        &timestamp,
        &format!("[{}] {message}", record.severity),
        json!(record),
    );
}

/// Stream the realtime feed until the duration elapses, Ctrl-C is pressed or
/// the channel ends, then print a summary.
///
/// # Errors
///
/// Returns an error if the backend URLs cannot be derived.
pub async fn execute(config: &Config, args: &MonitorArgs) -> Result<()> {
    let controller = factory::build_monitor(config)?;
    let api = factory::build_api(config)?;

    if !output::is_json() {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Feed", output::highlight(config.backend.realtime_url()?));
        if let Some(seconds) = args.duration {
            output::field("Duration", format!("{seconds} s"));
        }
        println!();
    }

    let mut snapshots = controller.subscribe();
    let mut printer = FeedPrinter::default();
    controller.start();
    info!("Monitor started");

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let deadline = async {
        match args.duration {
            Some(seconds) => tokio::time::sleep(Duration::from_secs(seconds)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            () = &mut deadline => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                printer.print(&snapshot);
                if snapshot.state == ConnectionState::Closed {
                    break;
                }
            }
        }
    }

    controller.stop().await;
    let snapshot = controller.snapshot();

    let stats = match api.dashboard_metrics().await {
        Ok(metrics) => snapshot.stats.clone().with_backend_metrics(&metrics),
        Err(e) => {
            warn!(error = %e, "Backend metrics unavailable");
            snapshot.stats.clone()
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "monitor",
            "disconnect": snapshot.disconnect,
            "stats": stats,
        }));
        return Ok(());
    }

    if let Some(cause) = snapshot.disconnect.as_ref().filter(|c| c.is_failure()) {
        println!();
        output::warning(&format!("Feed disconnected: {cause}"));
    }
    display_summary(&stats);
    Ok(())
}

fn display_summary(stats: &MonitorStats) {
    output::section("Session");
    output::field("Active transactions", stats.active_transactions);
    output::field(
        "Anomalies detected",
        output::negative(stats.anomalies_detected),
    );
    output::field("Total volume", format_usd(stats.total_volume));
    output::field(
        "Anomaly ratio",
        stats
            .anomaly_ratio
            .map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * 100.0)),
    );
    output::field("Critical alerts", stats.critical_alerts);
    output::field(
        "Detection rate",
        stats
            .detection_rate
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}%")),
    );
    output::field(
        "Avg detection time",
        stats
            .avg_detection_time
            .map_or_else(|| "-".to_string(), |t| format!("{t:.2} s")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(id: &str) -> TransactionRecord {
        TransactionRecord::new(id, dec!(10), false)
    }

    #[test]
    fn fresh_prefix_stops_at_last_seen() {
        let items = vec![tx("t3"), tx("t2"), tx("t1")];
        let seen = TransactionId::new("t2");

        let fresh = fresh_prefix(&items, Some(&seen), |t| &t.id);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id.as_str(), "t3");
    }

    #[test]
    fn fresh_prefix_takes_all_when_unseen() {
        let items = vec![tx("t9"), tx("t8")];

        assert_eq!(fresh_prefix(&items, None, |t| &t.id).len(), 2);
        let gone = TransactionId::new("t1");
        assert_eq!(fresh_prefix(&items, Some(&gone), |t| &t.id).len(), 2);
    }

    #[test]
    fn clock_shows_time_of_day_or_raw_value() {
        let mut alert = AlertRecord::new("a1", "spike", crate::domain::Severity::Critical);
        alert.timestamp = Some("2024-03-01T14:05:09.123".into());
        assert_eq!(clock(alert.raised_at(), alert.timestamp.as_deref()), "14:05:09");

        alert.timestamp = Some("yesterday".into());
        assert_eq!(clock(alert.raised_at(), alert.timestamp.as_deref()), "yesterday");
        assert_eq!(clock(None, None), "-");
    }

    #[test]
    fn printer_remembers_newest_records() {
        let mut printer = FeedPrinter::default();
        let snapshot = MonitorSnapshot {
            state: ConnectionState::Connected,
            monitoring: true,
            transactions: vec![tx("t2"), tx("t1")],
            ..MonitorSnapshot::default()
        };

        output::configure(output::OutputConfig::new(false, true));
        printer.print(&snapshot);

        assert_eq!(printer.state, ConnectionState::Connected);
        assert_eq!(printer.newest_transaction.as_ref().map(TransactionId::as_str), Some("t2"));
        assert!(printer.newest_alert.is_none());
    }
}
