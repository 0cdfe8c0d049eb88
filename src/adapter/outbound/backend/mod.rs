//! Fraud-detection backend adapter.
//!
//! REST access via [`BackendClient`] and the realtime feed via
//! [`WebSocketFeedStream`].

pub mod client;
pub mod dto;
pub mod settings;
pub mod stream;

pub use client::BackendClient;
pub use settings::{BackendConfig, BackendHttpConfig};
pub use stream::WebSocketFeedStream;
