//! Mock [`RealtimeStream`] implementations for testing.
//!
//! - [`ScriptedStream`]: pre-loaded connect/subscribe results and events.
//!   Best for: lifecycle and error-path tests.
//!
//! - [`ChannelStream`]: channel-backed stream with external control handle.
//!   Best for: tests needing on-demand event delivery, such as stop races.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::monitor::StreamFactory;
use crate::error::Result;
use crate::port::{FeedMessage, RealtimeStream, StreamEvent, SubscribeRequest};

/// Shared call counters of a mock stream.
#[derive(Debug, Clone, Default)]
pub struct StreamCounters {
    connect: Arc<AtomicU32>,
    subscribe: Arc<AtomicU32>,
    close: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<SubscribeRequest>>>,
}

impl StreamCounters {
    pub fn connect_count(&self) -> u32 {
        self.connect.load(Ordering::SeqCst)
    }

    pub fn subscribe_count(&self) -> u32 {
        self.subscribe.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> u32 {
        self.close.load(Ordering::SeqCst)
    }

    /// Subscribe requests sent so far.
    pub fn requests(&self) -> Vec<SubscribeRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record_subscribe(&self, request: &SubscribeRequest) {
        self.subscribe.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(*request);
    }
}

// ---------------------------------------------------------------------------
// ScriptedStream
// ---------------------------------------------------------------------------

/// A mock stream with scripted connect/subscribe results and a fixed event queue.
///
/// Each call to `connect()` or `subscribe()` pops the next result from the
/// corresponding queue (defaults to `Ok(())` when exhausted). Once the event
/// queue is drained, `next_event` blocks forever unless the stream was built
/// with [`ending`](Self::ending).
pub struct ScriptedStream {
    connect_results: VecDeque<Result<()>>,
    subscribe_results: VecDeque<Result<()>>,
    events: VecDeque<StreamEvent>,
    connect_delay: Option<Duration>,
    subscribe_delay: Option<Duration>,
    end_when_drained: bool,
    counters: StreamCounters,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self {
            connect_results: VecDeque::new(),
            subscribe_results: VecDeque::new(),
            events: VecDeque::new(),
            connect_delay: None,
            subscribe_delay: None,
            end_when_drained: false,
            counters: StreamCounters::default(),
        }
    }

    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    pub fn with_subscribe_results(mut self, results: Vec<Result<()>>) -> Self {
        self.subscribe_results = results.into();
        self
    }

    pub fn with_events(mut self, events: Vec<StreamEvent>) -> Self {
        self.events = events.into();
        self
    }

    /// Shorthand for a queue of decoded messages.
    pub fn with_messages(self, messages: Vec<FeedMessage>) -> Self {
        self.with_events(messages.into_iter().map(StreamEvent::Message).collect())
    }

    /// Delay every `connect()` call, e.g. to exercise the connect timeout.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Delay every `subscribe()` call.
    pub fn with_subscribe_delay(mut self, delay: Duration) -> Self {
        self.subscribe_delay = Some(delay);
        self
    }

    /// Return `None` once the event queue is drained.
    pub fn ending(mut self) -> Self {
        self.end_when_drained = true;
        self
    }

    /// Get shared counters for asserting call counts.
    pub fn counters(&self) -> StreamCounters {
        self.counters.clone()
    }
}

impl Default for ScriptedStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimeStream for ScriptedStream {
    async fn connect(&mut self) -> Result<()> {
        self.counters.connect.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn subscribe(&mut self, request: &SubscribeRequest) -> Result<()> {
        self.counters.record_subscribe(request);
        if let Some(delay) = self.subscribe_delay {
            tokio::time::sleep(delay).await;
        }
        self.subscribe_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<StreamEvent> {
        if let Some(event) = self.events.pop_front() {
            return Some(event);
        }
        if self.end_when_drained {
            return None;
        }
        std::future::pending().await
    }

    async fn close(&mut self) {
        self.counters.close.fetch_add(1, Ordering::SeqCst);
    }

    fn endpoint(&self) -> &str {
        "mock://scripted"
    }
}

// ---------------------------------------------------------------------------
// ChannelStream
// ---------------------------------------------------------------------------

/// A mock stream controlled externally via a [`ChannelStreamHandle`].
///
/// Events are sent into the handle and read by the consumer via
/// `next_event()`. Dropping the handle ends the stream. No real network I/O.
pub struct ChannelStream {
    event_rx: mpsc::Receiver<StreamEvent>,
    closed: Arc<AtomicBool>,
    counters: StreamCounters,
}

/// Control handle for a [`ChannelStream`].
pub struct ChannelStreamHandle {
    event_tx: mpsc::Sender<StreamEvent>,
    closed: Arc<AtomicBool>,
    counters: StreamCounters,
}

impl ChannelStreamHandle {
    /// Send an event. Returns `false` once the stream has been closed.
    pub async fn send(&self, event: StreamEvent) -> bool {
        self.event_tx.send(event).await.is_ok()
    }

    /// Send a decoded message.
    pub async fn send_message(&self, message: FeedMessage) -> bool {
        self.send(StreamEvent::Message(message)).await
    }

    /// Whether the consumer closed the stream.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn counters(&self) -> StreamCounters {
        self.counters.clone()
    }
}

/// Create a [`ChannelStream`] and its control [`ChannelStreamHandle`].
pub fn channel_stream(buffer: usize) -> (ChannelStream, ChannelStreamHandle) {
    let (tx, rx) = mpsc::channel(buffer);
    let closed = Arc::new(AtomicBool::new(false));
    let counters = StreamCounters::default();
    (
        ChannelStream {
            event_rx: rx,
            closed: closed.clone(),
            counters: counters.clone(),
        },
        ChannelStreamHandle {
            event_tx: tx,
            closed,
            counters,
        },
    )
}

#[async_trait]
impl RealtimeStream for ChannelStream {
    async fn connect(&mut self) -> Result<()> {
        self.counters.connect.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&mut self, request: &SubscribeRequest) -> Result<()> {
        self.counters.record_subscribe(request);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<StreamEvent> {
        self.event_rx.recv().await
    }

    async fn close(&mut self) {
        self.counters.close.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        self.event_rx.close();
    }

    fn endpoint(&self) -> &str {
        "mock://channel"
    }
}

/// A [`StreamFactory`] that hands out `stream` once and ordinary
/// [`ScriptedStream`]s afterwards.
pub fn single_use_factory(stream: impl RealtimeStream + 'static) -> StreamFactory {
    let slot: Mutex<Option<Box<dyn RealtimeStream>>> = Mutex::new(Some(Box::new(stream)));
    Arc::new(move || {
        slot.lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| Box::new(ScriptedStream::new()))
    })
}
