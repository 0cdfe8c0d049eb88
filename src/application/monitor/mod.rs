//! Live transaction monitor.
//!
//! [`LiveMonitor`] is the synchronous state machine holding the connection
//! state and the two bounded sequences. [`MonitorSession`] drives it from one
//! [`RealtimeStream`](crate::port::RealtimeStream) connection, and
//! [`MonitorController`] is the handle presentation code uses to start, stop
//! and observe monitoring.
//!
//! The stream is never reconnected automatically. A failed or closed
//! connection stops monitoring and records the cause; restarting takes an
//! explicit `start`. Fetches, by contrast, retry on their own (see
//! [`crate::application::fetch`]).

mod controller;
mod live;
mod session;
mod state;
mod stats;

pub use controller::{MonitorController, StreamFactory};
pub use live::{LiveMonitor, MonitorSnapshot};
pub use session::MonitorSession;
pub use state::{ConnectionState, DisconnectCause};
pub use stats::MonitorStats;
