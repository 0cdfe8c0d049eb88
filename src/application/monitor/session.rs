//! A single realtime connection's lifecycle.
//!
//! `connect` (bounded) -> `subscribe` -> event loop -> `close`. The stop
//! signal is checked first at every await point, so a stop request never
//! waits behind a slow peer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::live::{LiveMonitor, MonitorSnapshot};
use crate::port::{RealtimeStream, StreamEvent};

/// One realtime connection driving a [`LiveMonitor`].
///
/// Connects (bounded by the connect timeout), sends the subscribe request
/// once open, then applies events in arrival order until stopped, failed or
/// closed. The stream is closed on every exit path before the final snapshot
/// is published.
pub struct MonitorSession {
    stream: Box<dyn RealtimeStream>,
    monitor: LiveMonitor,
    snapshots: Arc<watch::Sender<MonitorSnapshot>>,
    connect_timeout: Duration,
}

enum Exit {
    Stopped,
    Failed(String),
    Closed(Option<String>),
}

impl MonitorSession {
    #[must_use]
    pub fn new(
        stream: Box<dyn RealtimeStream>,
        monitor: LiveMonitor,
        snapshots: Arc<watch::Sender<MonitorSnapshot>>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            monitor,
            snapshots,
            connect_timeout,
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.monitor.snapshot());
    }

    /// Run until `stop` fires (or its sender is dropped) or the channel ends.
    ///
    /// Returns the monitor in its final, closed state.
    pub async fn run(mut self, mut stop: oneshot::Receiver<()>) -> LiveMonitor {
        self.monitor.start();
        self.publish();

        let exit = self.drive(&mut stop).await;

        self.stream.close().await;
        match exit {
            Exit::Stopped => self.monitor.stop(),
            Exit::Failed(reason) => self.monitor.on_error(reason),
            Exit::Closed(reason) => self.monitor.on_close(reason),
        };
        self.publish();
        debug!(endpoint = self.stream.endpoint(), "Monitor session finished");
        self.monitor
    }

    async fn drive(&mut self, stop: &mut oneshot::Receiver<()>) -> Exit {
        let endpoint = self.stream.endpoint().to_string();
        let connect_timeout = self.connect_timeout;

        let connected = tokio::select! {
            biased;
            _ = &mut *stop => return Exit::Stopped,
            result = timeout(connect_timeout, self.stream.connect()) => result,
        };
        match connected {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(endpoint = %endpoint, error = %e, "Realtime connect failed");
                return Exit::Failed(e.to_string());
            }
            Err(_) => {
                let ms = connect_timeout.as_millis() as u64;
                warn!(endpoint = %endpoint, timeout_ms = ms, "Realtime connect timed out");
                return Exit::Failed(format!("connect timed out after {ms} ms"));
            }
        }

        if let Some(request) = self.monitor.on_open() {
            self.publish();
            let subscribed = tokio::select! {
                biased;
                _ = &mut *stop => return Exit::Stopped,
                result = self.stream.subscribe(&request) => result,
            };
            if let Err(e) = subscribed {
                warn!(endpoint = %endpoint, error = %e, "Subscribe failed");
                return Exit::Failed(e.to_string());
            }
        }
        info!(endpoint = %endpoint, "Live monitor subscribed");

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut *stop => return Exit::Stopped,
                event = self.stream.next_event() => event,
            };

            match event {
                Some(StreamEvent::Message(message)) => {
                    if self.monitor.apply(message) {
                        self.publish();
                    }
                }
                Some(StreamEvent::Error { reason }) => return Exit::Failed(reason),
                Some(StreamEvent::Closed { reason }) => return Exit::Closed(reason),
                None => return Exit::Closed(None),
            }
        }
    }
}
