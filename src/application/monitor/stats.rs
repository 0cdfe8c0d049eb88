use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::domain::{AlertRecord, BoundedSequence, DashboardMetrics, TransactionRecord};

/// Figures derived from the live sequences.
///
/// Recomputed on every snapshot, never stored. Detection rate and average
/// detection time are not derivable from the live data and stay `None` until
/// backend metrics are merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorStats {
    pub active_transactions: usize,
    pub anomalies_detected: usize,
    pub total_volume: Decimal,
    /// Anomalies over active transactions; `None` when there are none.
    pub anomaly_ratio: Option<f64>,
    pub critical_alerts: usize,
    pub detection_rate: Option<f64>,
    pub avg_detection_time: Option<f64>,
}

impl MonitorStats {
    #[must_use]
    pub fn compute(
        transactions: &BoundedSequence<TransactionRecord>,
        alerts: &BoundedSequence<AlertRecord>,
    ) -> Self {
        let active_transactions = transactions.len();
        let anomalies_detected = transactions.iter().filter(|t| t.is_anomaly).count();
        let total_volume = total_volume(transactions);
        let anomaly_ratio = (active_transactions > 0)
            .then(|| anomalies_detected as f64 / active_transactions as f64);

        Self {
            active_transactions,
            anomalies_detected,
            total_volume,
            anomaly_ratio,
            critical_alerts: alerts.iter().filter(|a| a.is_critical()).count(),
            detection_rate: None,
            avg_detection_time: None,
        }
    }

    /// Fill the backend-supplied figures.
    #[must_use]
    pub fn with_backend_metrics(mut self, metrics: &DashboardMetrics) -> Self {
        self.detection_rate = Some(metrics.detection_rate);
        self.avg_detection_time = Some(metrics.avg_detection_time);
        self
    }

    /// Total volume as a float, for charting.
    #[must_use]
    pub fn total_volume_f64(&self) -> f64 {
        self.total_volume.to_f64().unwrap_or_default()
    }
}

/// Sum of the live amounts, saturating at the `Decimal` bounds.
fn total_volume(transactions: &BoundedSequence<TransactionRecord>) -> Decimal {
    let mut total = Decimal::ZERO;
    for tx in transactions.iter() {
        match total.checked_add(tx.amount) {
            Some(sum) => total = sum,
            None => {
                warn!(transaction_id = %tx.id, "Transaction volume overflowed; saturating");
                return if tx.amount.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                };
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Severity;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_sequences_have_no_ratio() {
        let stats = MonitorStats::compute(&BoundedSequence::new(40), &BoundedSequence::new(10));
        assert_eq!(stats, MonitorStats::default());
        assert!(stats.anomaly_ratio.is_none());
    }

    #[test]
    fn counts_anomalies_volume_and_critical_alerts() {
        let mut txs = BoundedSequence::new(40);
        txs.push_front(TransactionRecord::new("t1", dec!(100), false));
        txs.push_front(TransactionRecord::new("t2", dec!(9000), true));
        let mut alerts = BoundedSequence::new(10);
        alerts.push_front(AlertRecord::new("a1", "spike", Severity::Critical));
        alerts.push_front(AlertRecord::new("a2", "note", Severity::Normal));

        let stats = MonitorStats::compute(&txs, &alerts);

        assert_eq!(stats.active_transactions, 2);
        assert_eq!(stats.anomalies_detected, 1);
        assert_eq!(stats.total_volume, dec!(9100));
        assert_eq!(stats.anomaly_ratio, Some(0.5));
        assert_eq!(stats.critical_alerts, 1);
        assert!((stats.total_volume_f64() - 9100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let mut txs = BoundedSequence::new(40);
        txs.push_front(TransactionRecord::new("big-1", Decimal::MAX - dec!(1), false));
        txs.push_front(TransactionRecord::new("big-2", Decimal::MAX - dec!(1), false));

        let stats = MonitorStats::compute(&txs, &BoundedSequence::new(10));

        assert_eq!(stats.active_transactions, 2);
        assert_eq!(stats.total_volume, Decimal::MAX);
    }

    #[test]
    fn backend_metrics_fill_detection_figures() {
        let metrics = DashboardMetrics {
            detection_rate: 94.7,
            avg_detection_time: 2.3,
            ..DashboardMetrics::default()
        };
        let stats = MonitorStats::default().with_backend_metrics(&metrics);

        assert_eq!(stats.detection_rate, Some(94.7));
        assert_eq!(stats.avg_detection_time, Some(2.3));
    }
}
