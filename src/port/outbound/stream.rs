//! Realtime feed port.
//!
//! Defines the push channel the live monitor consumes and the decoded
//! message vocabulary it understands.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AlertRecord, TransactionRecord};
use crate::error::Result;

/// Request sent once after the channel opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest {
    pub action: &'static str,
}

impl SubscribeRequest {
    #[must_use]
    pub const fn subscribe() -> Self {
        Self { action: "subscribe" }
    }
}

impl Default for SubscribeRequest {
    fn default() -> Self {
        Self::subscribe()
    }
}

/// One state change carried by a feed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedUpdate {
    /// A new transaction to prepend to the live list.
    LatestTransaction(TransactionRecord),
    /// A new alert to prepend to the alert list.
    NewAlert(AlertRecord),
    /// Full replacement of the live transaction list.
    TransactionSnapshot(Vec<TransactionRecord>),
}

/// A decoded feed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Recognized updates, in application order. Applied as one unit.
    Updates(Vec<FeedUpdate>),
    /// Well-formed JSON carrying none of the known keys.
    Unrecognized(serde_json::Value),
}

/// Event produced by a realtime stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A decoded text frame.
    Message(FeedMessage),
    /// The channel failed; no further events will follow.
    Error { reason: String },
    /// The peer closed the channel.
    Closed { reason: Option<String> },
}

/// A push channel delivering realtime feed events.
///
/// Implementations own the underlying connection. Frames that fail to
/// decode are logged and skipped inside the implementation; they never
/// surface as events.
#[async_trait]
pub trait RealtimeStream: Send {
    /// Open the connection. Resolves when the channel is open.
    async fn connect(&mut self) -> Result<()>;

    /// Send the subscribe request on an open channel.
    async fn subscribe(&mut self, request: &SubscribeRequest) -> Result<()>;

    /// Next event, or `None` once the channel has ended.
    async fn next_event(&mut self) -> Option<StreamEvent>;

    /// Release the connection. Idempotent.
    async fn close(&mut self);

    /// Endpoint description for logging.
    fn endpoint(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_serializes_to_action() {
        let json = serde_json::to_string(&SubscribeRequest::subscribe()).unwrap();
        assert_eq!(json, r#"{"action":"subscribe"}"#);
    }
}
