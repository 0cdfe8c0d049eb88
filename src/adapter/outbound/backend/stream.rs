//! Realtime feed over WebSocket.
//!
//! Connects to the backend's realtime endpoint, sends the subscribe request
//! and turns incoming text frames into [`StreamEvent`]s. Ping frames are
//! answered with pong, binary and pong frames are ignored, and frames that
//! fail to decode are logged and skipped.
//!
//! This stream does not reconnect. When the peer closes or the socket fails
//! it yields one terminal event and then `None`.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use super::dto::message::decode_frame;
use crate::error::{Error, Result};
use crate::port::{RealtimeStream, StreamEvent, SubscribeRequest};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Backend realtime feed implementing [`RealtimeStream`].
pub struct WebSocketFeedStream {
    url: String,
    ws: Option<Socket>,
}

impl WebSocketFeedStream {
    /// Create a disconnected stream.
    ///
    /// # Arguments
    ///
    /// * `url` - Realtime endpoint (e.g., `ws://localhost:8000/ws/realtime`)
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ws: None,
        }
    }

    /// Whether a socket is currently held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    fn terminate(&mut self, event: StreamEvent) -> Option<StreamEvent> {
        self.ws = None;
        Some(event)
    }
}

#[async_trait]
impl RealtimeStream for WebSocketFeedStream {
    async fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, "Connecting to realtime feed");
        let (ws_stream, response) = connect_async(self.url.as_str()).await?;
        info!(status = %response.status(), "Realtime feed connected");
        self.ws = Some(ws_stream);
        Ok(())
    }

    async fn subscribe(&mut self, request: &SubscribeRequest) -> Result<()> {
        let ws = self
            .ws
            .as_mut()
            .ok_or_else(|| Error::Connection("Not connected".into()))?;

        let json = serde_json::to_string(request)?;
        info!(action = request.action, "Subscribing to realtime feed");
        ws.send(Message::Text(json)).await?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<StreamEvent> {
        let ws = self.ws.as_mut()?;

        loop {
            let Some(frame) = ws.next().await else {
                debug!("Realtime feed ended without close frame");
                return self.terminate(StreamEvent::Closed { reason: None });
            };

            match frame {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received feed frame");
                    match decode_frame(&text) {
                        Ok(message) => return Some(StreamEvent::Message(message)),
                        Err(e) => {
                            warn!(error = %e, bytes = text.len(), "Failed to parse feed frame");
                        }
                    }
                }
                Ok(Message::Ping(data)) => {
                    trace!("Received WebSocket ping");
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        error!(error = %e, "Failed to send pong");
                        return self.terminate(StreamEvent::Error {
                            reason: format!("failed to send pong: {e}"),
                        });
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "Realtime feed closed by server");
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .filter(|r| !r.is_empty());
                    return self.terminate(StreamEvent::Closed { reason });
                }
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "Realtime feed error");
                    return self.terminate(StreamEvent::Error {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut ws) = self.ws.take() {
            debug!(url = %self.url, "Closing realtime feed");
            if let Err(e) = ws.close(None).await {
                debug!(error = %e, "Close handshake failed");
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
