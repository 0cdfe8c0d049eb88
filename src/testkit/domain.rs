//! Builders for domain records and feed messages.

use rust_decimal::Decimal;

use crate::domain::{AlertRecord, Anomaly, AnomalyId, AnomalyStatus, Severity, TransactionRecord};
use crate::port::{FeedMessage, FeedUpdate};

pub fn transaction(id: &str, amount: Decimal, is_anomaly: bool) -> TransactionRecord {
    TransactionRecord {
        from_account: Some(format!("ACC-{id}-A")),
        to_account: Some(format!("ACC-{id}-B")),
        timestamp: Some("2024-01-15T10:30:00Z".into()),
        ..TransactionRecord::new(id, amount, is_anomaly)
    }
}

pub fn alert(id: &str, severity: Severity) -> AlertRecord {
    AlertRecord::new(id, format!("alert {id}"), severity)
}

pub fn anomaly(id: &str, status: AnomalyStatus, score: f64) -> Anomaly {
    Anomaly {
        id: AnomalyId::new(id),
        transaction_id: Some(format!("tx-{id}").into()),
        anomaly_score: score,
        status,
        detection_method: Some("statistical".into()),
        created_at: Some("2024-01-15T10:30:00".into()),
    }
}

/// `{latest_transaction: ...}` frame.
pub fn latest_transaction(id: &str, amount: Decimal, is_anomaly: bool) -> FeedMessage {
    FeedMessage::Updates(vec![FeedUpdate::LatestTransaction(transaction(
        id, amount, is_anomaly,
    ))])
}

/// `{new_alert: ...}` frame.
pub fn new_alert(id: &str, severity: Severity) -> FeedMessage {
    FeedMessage::Updates(vec![FeedUpdate::NewAlert(alert(id, severity))])
}

/// `{transactions: [...]}` frame with `count` records `s0..`.
pub fn transaction_snapshot(count: usize) -> FeedMessage {
    let list = (0..count)
        .map(|i| transaction(&format!("s{i}"), Decimal::ONE, false))
        .collect();
    FeedMessage::Updates(vec![FeedUpdate::TransactionSnapshot(list)])
}
