use std::fmt;

use serde::Serialize;

/// Lifecycle of one realtime connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Terminal for this connection; `start` begins a fresh one.
    Closed,
}

impl ConnectionState {
    /// Connecting or connected.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why monitoring stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "cause", content = "reason", rename_all = "lowercase")]
pub enum DisconnectCause {
    /// Stopped on request.
    Stopped,
    /// The channel failed.
    Error(String),
    /// The peer closed the channel.
    Closed(Option<String>),
}

impl DisconnectCause {
    /// Whether presentation should show an error banner.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "monitoring stopped"),
            Self::Error(reason) => write!(f, "connection error: {reason}"),
            Self::Closed(Some(reason)) => write!(f, "connection closed: {reason}"),
            Self::Closed(None) => write!(f, "connection closed"),
        }
    }
}
