//! Network infrastructure: the WebSocket transport connector.
//!
//! Handles the persistent channel to the game server and delivers decoded
//! [`ServerMessage`]s to the application layer.
//!
//! Architecture:
//! - `ServerConnection` owns the channel lifecycle: connect, read, write,
//!   reconnect.  One background task runs the connect/read loop; a second,
//!   per-connection task drains the outbound queue into the socket.
//! - Inbound frames are decoded and forwarded on an `mpsc` channel as
//!   [`NetworkEvent`]s, consumed by the single dispatch loop.
//! - Outbound messages go through [`ServerConnection::send`], which drops
//!   them silently while the channel is closed; no queueing, no retry.
//!   Transport-level errors are logged only; the close event is the sole
//!   trigger for recovery.

pub mod reconnect;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use gomoku_core::protocol::codec::{decode_server, encode_client, ProtocolError};
use gomoku_core::protocol::messages::{ClientMessage, ServerMessage};

use crate::application::context::MessageSink;

pub use reconnect::{FixedDelay, ReconnectPolicy};

/// Events emitted by the transport to the dispatch loop.
#[derive(Debug)]
pub enum NetworkEvent {
    /// The channel was established.
    Connected,
    /// The channel was lost; a reconnect is already scheduled.
    Disconnected,
    /// A frame was received and decoded.
    MessageReceived(ServerMessage),
}

/// Manages the WebSocket connection from the client to the game server.
pub struct ServerConnection {
    endpoint_url: String,
    /// Handle to the current connection's outbound queue; `None` while the
    /// channel is closed, which is what makes `send` drop messages then.
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl ServerConnection {
    /// Creates a new (not yet connected) `ServerConnection` for the given
    /// `ws://` or `wss://` endpoint URL.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            outbound: Mutex::new(None),
        }
    }

    /// Whether the channel is currently open.
    pub fn is_open(&self) -> bool {
        self.outbound.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Connects and begins reading frames.
    ///
    /// Returns a channel receiver delivering [`NetworkEvent`]s to the
    /// caller.  Runs a continuous reconnect loop until `running` is set to
    /// false: every drop of the channel schedules exactly one retry after
    /// `policy.next_delay()`, with no upper bound on attempts.
    pub async fn start(
        self: Arc<Self>,
        mut policy: Box<dyn ReconnectPolicy>,
        running: Arc<AtomicBool>,
    ) -> mpsc::Receiver<NetworkEvent> {
        let (tx, rx) = mpsc::channel(128);
        let this = Arc::clone(&self);

        tokio::spawn(async move {
            while running.load(Ordering::Relaxed) {
                match connect_async(this.endpoint_url.as_str()).await {
                    Ok((ws_stream, _)) => {
                        info!("connected to {}", this.endpoint_url);
                        policy.reset();

                        let (mut ws_tx, mut ws_rx) = ws_stream.split();

                        // Fresh outbound queue for this connection; the old
                        // one (and anything still in it) died with the
                        // previous connection.
                        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
                        this.set_outbound(Some(out_tx));

                        if tx.send(NetworkEvent::Connected).await.is_err() {
                            return;
                        }

                        // Writer task: drains the outbound queue into the
                        // socket until either side goes away.
                        let writer = tokio::spawn(async move {
                            while let Some(frame) = out_rx.recv().await {
                                if let Err(e) = ws_tx.send(WsMessage::Text(frame)).await {
                                    warn!("write failed: {e}");
                                    break;
                                }
                            }
                        });

                        // Read loop: runs until close or transport error.
                        read_loop(&mut ws_rx, &tx).await;

                        this.set_outbound(None);
                        writer.abort();

                        if tx.send(NetworkEvent::Disconnected).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("could not connect to {}: {e}", this.endpoint_url);
                    }
                }

                if running.load(Ordering::Relaxed) {
                    let delay = policy.next_delay();
                    debug!("reconnecting in {delay:?}");
                    time::sleep(delay).await;
                }
            }
        });

        rx
    }

    fn set_outbound(&self, sender: Option<mpsc::UnboundedSender<String>>) {
        match self.outbound.lock() {
            Ok(mut guard) => *guard = sender,
            // Poisoning means a panic elsewhere; the connection is done for.
            Err(e) => error!("outbound handle poisoned: {e}"),
        }
    }
}

impl MessageSink for ServerConnection {
    /// Encodes and transmits `msg` if the channel is open; otherwise the
    /// message is silently dropped.
    fn send(&self, msg: &ClientMessage) {
        let frame = match encode_client(msg) {
            Ok(frame) => frame,
            Err(e) => {
                error!("failed to encode {:?}: {e}", msg.message_type());
                return;
            }
        };

        let Ok(guard) = self.outbound.lock() else {
            error!("outbound handle poisoned; dropped {:?}", msg.message_type());
            return;
        };
        match guard.as_ref() {
            Some(out_tx) => {
                // The writer task only disappears when the connection is
                // tearing down; dropping the frame then is the contract.
                if out_tx.send(frame).is_err() {
                    debug!("connection closing; dropped {:?}", msg.message_type());
                }
            }
            None => debug!("channel not open; dropped {:?}", msg.message_type()),
        }
    }
}

/// Reads frames until the channel closes, forwarding decoded messages.
///
/// Unknown type codes are dropped silently by design; malformed frames are
/// logged as protocol violations and likewise dropped.  Neither tears the
/// connection down.
async fn read_loop(
    ws_rx: &mut (impl Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>> + Unpin),
    tx: &mpsc::Sender<NetworkEvent>,
) {
    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => match decode_server(&text) {
                Ok(msg) => {
                    debug!("received {:?}", msg.message_type());
                    if tx.send(NetworkEvent::MessageReceived(msg)).await.is_err() {
                        return;
                    }
                }
                Err(ProtocolError::UnknownType(code)) => {
                    debug!("no handler for message type {code}; dropped");
                }
                Err(e) => warn!("undecodable frame: {e}"),
            },
            Ok(WsMessage::Close(_)) => {
                info!("server closed the channel");
                return;
            }
            // Protocol-level ping/pong is handled by tungstenite itself;
            // binary frames are not part of this protocol.
            Ok(_) => {}
            Err(e) => {
                warn!("transport error: {e}");
                return;
            }
        }
    }
}

// ── Recording sink (test double) ──────────────────────────────────────────────

/// A [`MessageSink`] that records every message instead of transmitting.
///
/// Used throughout the unit and integration tests as the stand-in for
/// [`ServerConnection`].
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<ClientMessage>>,
}

impl RecordingSink {
    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<ClientMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Clears and returns the recording.
    pub fn drain(&self) -> Vec<ClientMessage> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, msg: &ClientMessage) {
        self.sent.lock().unwrap().push(msg.clone());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_connection_is_not_open() {
        let conn = ServerConnection::new("ws://127.0.0.1:8080/ws");
        assert!(!conn.is_open());
    }

    #[test]
    fn test_send_while_closed_drops_silently() {
        // Arrange: no connection has ever been established.
        let conn = ServerConnection::new("ws://127.0.0.1:8080/ws");

        // Act – must not panic, block, or queue
        conn.send(&ClientMessage::Ping);

        // Assert – still closed, nothing buffered for a later connection
        assert!(!conn.is_open());
        let guard = conn.outbound.lock().unwrap();
        assert!(guard.is_none());
    }

    #[test]
    fn test_send_while_open_enqueues_encoded_frame() {
        // Arrange: install an outbound queue as the connect loop would.
        let conn = ServerConnection::new("ws://127.0.0.1:8080/ws");
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        conn.set_outbound(Some(out_tx));

        // Act
        conn.send(&ClientMessage::Ping);

        // Assert
        assert!(conn.is_open());
        let frame = out_rx.try_recv().unwrap();
        assert_eq!(frame, r#"{"type":1000,"payload":{}}"#);
    }

    #[test]
    fn test_clearing_outbound_closes_the_channel() {
        let conn = ServerConnection::new("ws://127.0.0.1:8080/ws");
        let (out_tx, _out_rx) = mpsc::unbounded_channel::<String>();
        conn.set_outbound(Some(out_tx));
        assert!(conn.is_open());

        conn.set_outbound(None);

        assert!(!conn.is_open());
    }

    #[test]
    fn test_start_returns_receiver_immediately() {
        // Even when the endpoint refuses connections, start() must hand back
        // the event receiver synchronously.
        tokio_test::block_on(async {
            let conn = Arc::new(ServerConnection::new("ws://127.0.0.1:1/ws"));
            let running = Arc::new(AtomicBool::new(false));

            let rx = conn
                .start(Box::new(FixedDelay::default()), Arc::clone(&running))
                .await;

            drop(rx);
        });
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let sink = RecordingSink::default();
        sink.send(&ClientMessage::Ping);
        sink.send(&ClientMessage::RoomList);

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ClientMessage::Ping);
        assert_eq!(sent[1], ClientMessage::RoomList);
    }
}
