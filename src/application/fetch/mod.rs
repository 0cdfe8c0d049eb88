//! Retrying data fetcher.
//!
//! Wraps one asynchronous backend call with bounded, linearly backed-off
//! retry and publishes a single [`FetchState`] on a watch channel.

mod fetcher;
mod policy;
mod state;

pub use fetcher::{FetchOperation, RetryingFetcher};
pub use policy::RetryPolicy;
pub use state::{FetchError, FetchState};
