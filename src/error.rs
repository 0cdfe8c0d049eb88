use thiserror::Error;

use crate::application::fetch::FetchError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Normalized failure of a backend REST call.
///
/// Every request made through the backend client ends up in exactly one of
/// these classes, each of which maps to a fixed user-facing message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// The request was sent but no response arrived (timeout, refused, reset).
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// Something failed locally: building the request or decoding the body.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Message suitable for showing to an operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::NoResponse(_) => "No response from server. Please check your connection.".into(),
            Self::Unexpected(_) => "An unexpected error occurred.".into(),
        }
    }

    /// HTTP status for server-side failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

impl Error {
    /// Message suitable for showing to an operator.
    ///
    /// Backend failures use the normalized [`ApiError`] wording; everything
    /// else falls back to the error's display text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Fetch(err) => format!("{err}: {}", err.last_error()),
            other => other.to_string(),
        }
    }
}
