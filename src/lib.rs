//! Fraudwatch - terminal client for a fraud and anomaly detection backend.
//!
//! # Architecture
//!
//! - **`domain`** - Transactions, alerts, anomalies, metrics and the account
//!   network graph, independent of any transport.
//! - **`port`** - Traits the application consumes: the REST surface
//!   ([`port::DashboardApi`]) and the realtime push channel
//!   ([`port::RealtimeStream`]).
//! - **`adapter`** - The HTTP/WebSocket backend implementation and the CLI.
//! - **`application`** - The retrying data fetcher, the live monitor and the
//!   anomaly board.
//! - **`infrastructure`** - Configuration loading and wiring.
//!
//! # Example
//!
//! ```no_run
//! use fraudwatch::infrastructure::config::Config;
//! use fraudwatch::infrastructure::factory;
//!
//! # async fn example() -> fraudwatch::error::Result<()> {
//! let config = Config::load("fraudwatch.toml")?;
//! let monitor = factory::build_monitor(&config)?;
//! monitor.start();
//! let mut snapshots = monitor.subscribe();
//! snapshots.changed().await.ok();
//! println!("{:?}", snapshots.borrow().state);
//! monitor.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
