//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the application core and the backend it
//! talks to. Outbound adapters implement them; tests substitute the
//! scripted implementations from the testkit.
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │      Application        │
//!                 │  fetcher · monitor ·    │
//!                 │  anomaly board          │
//!                 └───────────┬─────────────┘
//!                             │ ports
//!             ┌───────────────┴───────────────┐
//!             ▼                               ▼
//!     ┌───────────────┐               ┌───────────────┐
//!     │ RealtimeStream│               │ DashboardApi  │
//!     │  (WebSocket)  │               │    (REST)     │
//!     └───────────────┘               └───────────────┘
//! ```

pub mod outbound;

pub use outbound::api::{
    AnomalyQuery, DashboardApi, TransactionQuery, DEFAULT_PAGE_LIMIT, DEFAULT_TREND_DAYS,
};
pub use outbound::stream::{
    FeedMessage, FeedUpdate, RealtimeStream, StreamEvent, SubscribeRequest,
};
