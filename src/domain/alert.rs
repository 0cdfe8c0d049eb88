//! System alerts pushed over the realtime channel.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::AlertId;
use super::transaction::parse_timestamp;

/// Alert severity.
///
/// The backend only distinguishes critical alerts; any other value is
/// treated as normal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    #[default]
    Normal,
    Critical,
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("critical") {
            Self::Critical
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A system alert. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: AlertId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AlertRecord {
    pub fn new(id: impl Into<AlertId>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Parsed timestamp, if present and well-formed.
    #[must_use]
    pub fn raised_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}
