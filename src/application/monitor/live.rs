//! Live monitor state.
//!
//! Lifecycle of one monitoring run:
//!
//! ```text
//! Disconnected --start--> Connecting --on_open--> Connected
//!      ^                      |                      |
//!      |                 on_error / stop     apply / on_error / on_close / stop
//!      |                      v                      v
//!      +------- start ------ Closed <----------------+
//! ```
//!
//! Feed frames only land while `Connected`. Derived figures are computed
//! from the sequences on demand, see [`MonitorStats`].

use serde::Serialize;
use tracing::{debug, info, warn};

use super::state::{ConnectionState, DisconnectCause};
use super::stats::MonitorStats;
use crate::domain::{AlertRecord, BoundedSequence, TransactionRecord};
use crate::infrastructure::config::monitor::MonitorConfig;
use crate::port::{FeedMessage, FeedUpdate, SubscribeRequest};

/// Live monitor state machine.
///
/// Holds the connection state and two most-recent-first sequences. All
/// mutation goes through the lifecycle methods below; sequences are only
/// touched while [`ConnectionState::Connected`], so anything that arrives
/// after a stop is ignored.
#[derive(Debug, Clone)]
pub struct LiveMonitor {
    state: ConnectionState,
    monitoring: bool,
    transactions: BoundedSequence<TransactionRecord>,
    alerts: BoundedSequence<AlertRecord>,
    disconnect: Option<DisconnectCause>,
}

impl LiveMonitor {
    /// Create a disconnected monitor with empty sequences.
    ///
    /// # Arguments
    ///
    /// * `transaction_capacity` - Most transactions kept, newest first
    /// * `alert_capacity` - Most alerts kept, newest first
    #[must_use]
    pub fn new(transaction_capacity: usize, alert_capacity: usize) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            monitoring: false,
            transactions: BoundedSequence::new(transaction_capacity),
            alerts: BoundedSequence::new(alert_capacity),
            disconnect: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.transaction_capacity, config.alert_capacity)
    }

    /// Begin a fresh connection: Connecting, with both sequences emptied.
    ///
    /// Ignored while a connection is already active. Returns whether the
    /// state changed.
    pub fn start(&mut self) -> bool {
        if self.state.is_active() {
            debug!(state = %self.state, "Start ignored, monitor already active");
            return false;
        }
        self.state = ConnectionState::Connecting;
        self.monitoring = true;
        self.disconnect = None;
        self.transactions.clear();
        self.alerts.clear();
        info!("Live monitoring starting");
        true
    }

    /// The channel opened. Returns the request to send, or `None` when not
    /// connecting.
    pub fn on_open(&mut self) -> Option<SubscribeRequest> {
        if self.state != ConnectionState::Connecting {
            debug!(state = %self.state, "Open event ignored");
            return None;
        }
        self.state = ConnectionState::Connected;
        info!("Live monitoring connected");
        Some(SubscribeRequest::subscribe())
    }

    /// Apply one decoded frame. All of its updates land in one mutation.
    ///
    /// Returns whether the sequences changed.
    pub fn apply(&mut self, message: FeedMessage) -> bool {
        if self.state != ConnectionState::Connected {
            debug!(state = %self.state, "Feed message ignored, not connected");
            return false;
        }

        match message {
            FeedMessage::Updates(updates) => {
                let changed = !updates.is_empty();
                for update in updates {
                    self.apply_update(update);
                }
                changed
            }
            FeedMessage::Unrecognized(value) => {
                warn!(message = %value, "Unrecognized feed message ignored");
                false
            }
        }
    }

    fn apply_update(&mut self, update: FeedUpdate) {
        match update {
            FeedUpdate::LatestTransaction(tx) => {
                debug!(
                    id = %tx.id,
                    amount = %tx.amount,
                    anomaly = tx.is_anomaly,
                    "Transaction received"
                );
                self.transactions.push_front(tx);
            }
            FeedUpdate::NewAlert(alert) => {
                debug!(id = %alert.id, severity = %alert.severity, "Alert received");
                self.alerts.push_front(alert);
            }
            FeedUpdate::TransactionSnapshot(list) => {
                debug!(count = list.len(), "Transaction snapshot received");
                self.transactions.replace(list);
            }
        }
    }

    /// Stop on request.
    pub fn stop(&mut self) -> bool {
        self.close_with(DisconnectCause::Stopped)
    }

    /// The channel failed.
    pub fn on_error(&mut self, reason: impl Into<String>) -> bool {
        self.close_with(DisconnectCause::Error(reason.into()))
    }

    /// The peer closed the channel.
    pub fn on_close(&mut self, reason: Option<String>) -> bool {
        self.close_with(DisconnectCause::Closed(reason))
    }

    fn close_with(&mut self, cause: DisconnectCause) -> bool {
        if !self.state.is_active() {
            return false;
        }
        match &cause {
            DisconnectCause::Stopped => info!("Live monitoring stopped"),
            other => warn!(cause = %other, "Live monitoring ended"),
        }
        self.state = ConnectionState::Closed;
        self.monitoring = false;
        self.disconnect = Some(cause);
        true
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether a run is in progress. Cleared by every terminal transition.
    #[must_use]
    pub const fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Live transactions, newest first.
    #[must_use]
    pub const fn transactions(&self) -> &BoundedSequence<TransactionRecord> {
        &self.transactions
    }

    /// Live alerts, newest first.
    #[must_use]
    pub const fn alerts(&self) -> &BoundedSequence<AlertRecord> {
        &self.alerts
    }

    /// Why the last run ended; `None` until one has.
    #[must_use]
    pub const fn disconnect_cause(&self) -> Option<&DisconnectCause> {
        self.disconnect.as_ref()
    }

    /// Figures derived from the current sequences.
    #[must_use]
    pub fn stats(&self) -> MonitorStats {
        MonitorStats::compute(&self.transactions, &self.alerts)
    }

    /// Immutable copy of the current state for observers.
    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            state: self.state,
            monitoring: self.monitoring,
            transactions: self.transactions.to_vec(),
            alerts: self.alerts.to_vec(),
            disconnect: self.disconnect.clone(),
            stats: self.stats(),
        }
    }
}

impl Default for LiveMonitor {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// What observers see: a consistent view taken after a complete mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub state: ConnectionState,
    pub monitoring: bool,
    /// Newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Newest first.
    pub alerts: Vec<AlertRecord>,
    pub disconnect: Option<DisconnectCause>,
    pub stats: MonitorStats,
}
