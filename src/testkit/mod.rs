//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`stream`]: mock [`RealtimeStream`](crate::port::RealtimeStream)
//!   implementations: `ScriptedStream`, `ChannelStream`.
//! - [`api`]: `ScriptedApi`, a canned [`DashboardApi`](crate::port::DashboardApi).
//! - [`domain`]: builders for records and feed messages.
//! - [`config`]: canonical test configurations.

pub mod api;
pub mod config;
pub mod domain;
pub mod stream;
