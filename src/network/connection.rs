//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task and pumps two directions at
//! once:
//!
//! ```text
//!   WebSocket reader ──decode──▶ ChatHandle (actor mailbox)
//!   WebSocket writer ◀─encode─── outbound queue (fed by the actor)
//! ```
//!
//! The outbound queue is bounded by `limits.sendq`. When the actor drops
//! this connection for falling behind, the inbox hang-up signal fires and
//! the pump stops, even if it is parked in a write to a peer that stopped
//! reading. Whatever ends the pump, the connection detaches from the actor
//! exactly once on the way out.

use crate::config::LimitsConfig;
use crate::state::{recipient_channel, ChatHandle, Inbox, Uid};
use chatrelay_proto::frame::{decode_client_frame, encode_server_frame};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError as WsProtocolError};
use tracing::{debug, info};

/// How long a dropped connection may spend saying goodbye.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// What the select loop decided to do with one wakeup.
enum Step {
    Continue,
    Close,
    /// The actor stopped delivering to this connection.
    HangUp,
}

/// A client connection handler.
pub struct Connection {
    uid: Uid,
    addr: SocketAddr,
    ws: WebSocketStream<TcpStream>,
    chat: ChatHandle,
    sendq: usize,
    max_message_bytes: usize,
}

impl Connection {
    pub fn new(
        uid: Uid,
        addr: SocketAddr,
        ws: WebSocketStream<TcpStream>,
        chat: ChatHandle,
        limits: &LimitsConfig,
    ) -> Self {
        Self {
            uid,
            addr,
            ws,
            chat,
            sendq: limits.sendq,
            max_message_bytes: limits.max_message_bytes,
        }
    }

    /// Run the connection until either side hangs up.
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            uid,
            addr,
            ws,
            chat,
            sendq,
            max_message_bytes,
        } = self;

        let (recipient, inbox) = recipient_channel(sendq);
        chat.attach(uid.clone(), recipient).await?;
        info!(%uid, %addr, "Client connected");

        let result = pump(&uid, ws, &chat, inbox, max_message_bytes).await;

        if let Err(e) = chat.detach(uid.clone()).await {
            debug!(%uid, error = %e, "Detach skipped");
        }
        info!(%uid, %addr, "Client disconnected");
        result
    }
}

async fn pump(
    uid: &Uid,
    ws: WebSocketStream<TcpStream>,
    chat: &ChatHandle,
    inbox: Inbox,
    max_message_bytes: usize,
) -> anyhow::Result<()> {
    let (mut sink, mut stream) = ws.split();
    let Inbox {
        mut events,
        mut hangup,
    } = inbox;

    loop {
        let step = tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match decode_client_frame(&text, max_message_bytes) {
                        Ok(event) => chat.inbound(uid.clone(), event).await?,
                        Err(e) => {
                            debug!(%uid, error = %e, "Ignoring undecodable frame");
                            crate::metrics::record_frame_rejected(e.error_code());
                        }
                    }
                    Step::Continue
                }
                Some(Ok(Message::Close(_))) | None => Step::Close,
                // Pings are answered by tungstenite itself.
                Some(Ok(_)) => Step::Continue,
                Some(Err(e)) if is_disconnect(&e) => Step::Close,
                Some(Err(e)) => return Err(e.into()),
            },

            outbound = events.recv() => match outbound {
                Some(event) => {
                    let text = encode_server_frame(&event)?;
                    tokio::select! {
                        sent = sink.send(Message::Text(text)) => {
                            sent?;
                            crate::metrics::record_message_sent();
                            Step::Continue
                        }
                        _ = &mut hangup => Step::HangUp,
                    }
                }
                None => Step::HangUp,
            },

            _ = &mut hangup => Step::HangUp,
        };

        match step {
            Step::Continue => {}
            Step::Close => return Ok(()),
            Step::HangUp => {
                info!(%uid, "Dropped by server, hanging up");
                let _ = tokio::time::timeout(CLOSE_GRACE, sink.send(Message::Close(None))).await;
                return Ok(());
            }
        }
    }
}

/// Errors that only mean the peer went away.
fn is_disconnect(e: &WsError) -> bool {
    matches!(
        e,
        WsError::ConnectionClosed
            | WsError::AlreadyClosed
            | WsError::Io(_)
            | WsError::Protocol(WsProtocolError::ResetWithoutClosingHandshake)
    )
}
