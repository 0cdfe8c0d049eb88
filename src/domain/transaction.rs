//! Transaction records as pushed by the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::TransactionId;
use super::money::Amount;

/// A single transaction seen by the detection pipeline.
///
/// Only `id` is mandatory on the wire. Missing or null fields fall back to
/// empty accounts, a zero amount and `is_anomaly = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    #[serde(default)]
    pub from_account: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Amount,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_anomaly: bool,
}

impl TransactionRecord {
    /// Create a record with only the fields the derived metrics need.
    pub fn new(id: impl Into<TransactionId>, amount: Amount, is_anomaly: bool) -> Self {
        Self {
            id: id.into(),
            from_account: None,
            to_account: None,
            amount,
            timestamp: None,
            is_anomaly,
        }
    }

    /// Sending account, or `Unknown` when the backend omitted it.
    #[must_use]
    pub fn from_label(&self) -> &str {
        self.from_account.as_deref().unwrap_or("Unknown")
    }

    /// Receiving account, or `Unknown` when the backend omitted it.
    #[must_use]
    pub fn to_label(&self) -> &str {
        self.to_account.as_deref().unwrap_or("Unknown")
    }

    /// Parsed timestamp, if present and well-formed.
    #[must_use]
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the naive ISO-8601 form (no offset) which is taken
/// to be UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
