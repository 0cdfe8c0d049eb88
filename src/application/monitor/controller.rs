//! Owner of the monitor's background session.
//!
//! At most one session task runs at a time. Observers follow it through a
//! watch channel of [`MonitorSnapshot`]s, which stays readable after the
//! session ends.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::live::{LiveMonitor, MonitorSnapshot};
use super::session::MonitorSession;
use super::state::{ConnectionState, DisconnectCause};
use crate::infrastructure::config::monitor::MonitorConfig;
use crate::port::RealtimeStream;

/// Factory producing a fresh stream for each monitoring session.
pub type StreamFactory = Arc<dyn Fn() -> Box<dyn RealtimeStream> + Send + Sync>;

struct Running {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<LiveMonitor>,
}

/// Presentation-facing handle to the live monitor.
///
/// Commands go in through [`start`](Self::start) and [`stop`](Self::stop);
/// state comes out read-only through [`subscribe`](Self::subscribe). At most
/// one session runs at a time.
pub struct MonitorController {
    factory: StreamFactory,
    config: MonitorConfig,
    snapshots: Arc<watch::Sender<MonitorSnapshot>>,
    running: Mutex<Option<Running>>,
}

impl MonitorController {
    /// Create an idle controller.
    ///
    /// # Arguments
    ///
    /// * `factory` - Builds a fresh stream for every session
    /// * `config` - Sequence capacities and the connect timeout
    #[must_use]
    pub fn new(factory: StreamFactory, config: MonitorConfig) -> Self {
        let (tx, _) = watch::channel(LiveMonitor::from_config(&config).snapshot());
        Self {
            factory,
            config,
            snapshots: Arc::new(tx),
            running: Mutex::new(None),
        }
    }

    /// Start a session. No-op while one is running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            debug!("Monitor already running");
            return false;
        }

        let mut monitor = LiveMonitor::from_config(&self.config);
        monitor.start();
        self.snapshots.send_replace(monitor.snapshot());

        let session = MonitorSession::new(
            (self.factory)(),
            monitor,
            Arc::clone(&self.snapshots),
            Duration::from_millis(self.config.connect_timeout_ms),
        );
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(session.run(stop_rx));
        *running = Some(Running { stop, handle });
        true
    }

    /// Stop the running session and wait until its stream is closed.
    ///
    /// Returns whether a session was running. A session task that died
    /// without closing is published as `Closed` with an error cause.
    pub async fn stop(&self) -> bool {
        let running = self.running.lock().take();
        let Some(Running { stop, handle }) = running else {
            return false;
        };
        // The session may already have ended on its own.
        let _ = stop.send(());
        if let Err(e) = handle.await {
            warn!(error = %e, "Monitor session task failed");
            self.snapshots.send_modify(|snapshot| {
                snapshot.state = ConnectionState::Closed;
                snapshot.monitoring = false;
                snapshot.disconnect = Some(DisconnectCause::Error(format!(
                    "monitor session aborted: {e}"
                )));
            });
        }
        true
    }

    /// Whether a session task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Receiver of every published snapshot, starting from the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshots.borrow().clone()
    }
}
