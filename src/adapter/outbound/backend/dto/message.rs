//! Realtime feed frames.
//!
//! The backend pushes JSON objects carrying any combination of three keys:
//!
//! ```json
//! {"latest_transaction": {...}, "new_alert": {...}, "transactions": [...]}
//! ```
//!
//! Objects with none of the keys are passed through as unrecognized. A frame
//! whose known keys fail to decode is malformed.

use serde::Deserialize;

use crate::domain::{AlertRecord, TransactionRecord};
use crate::port::{FeedMessage, FeedUpdate};

const KNOWN_KEYS: [&str; 3] = ["latest_transaction", "new_alert", "transactions"];

/// Envelope of a feed frame. Null keys count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct FeedEnvelope {
    #[serde(default)]
    pub latest_transaction: Option<TransactionRecord>,
    #[serde(default)]
    pub new_alert: Option<AlertRecord>,
    #[serde(default)]
    pub transactions: Option<Vec<TransactionRecord>>,
}

impl FeedEnvelope {
    /// Updates in application order.
    #[must_use]
    pub fn into_updates(self) -> Vec<FeedUpdate> {
        let mut updates = Vec::with_capacity(3);
        if let Some(tx) = self.latest_transaction {
            updates.push(FeedUpdate::LatestTransaction(tx));
        }
        if let Some(alert) = self.new_alert {
            updates.push(FeedUpdate::NewAlert(alert));
        }
        if let Some(list) = self.transactions {
            updates.push(FeedUpdate::TransactionSnapshot(list));
        }
        updates
    }
}

fn carries_known_key(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|obj| {
        KNOWN_KEYS
            .iter()
            .any(|key| obj.get(*key).is_some_and(|v| !v.is_null()))
    })
}

/// Decode one text frame.
///
/// # Errors
///
/// Returns an error if the text is not JSON or a known key has the wrong shape.
pub fn decode_frame(text: &str) -> serde_json::Result<FeedMessage> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !carries_known_key(&value) {
        return Ok(FeedMessage::Unrecognized(value));
    }
    let envelope = FeedEnvelope::deserialize(value)?;
    Ok(FeedMessage::Updates(envelope.into_updates()))
}
