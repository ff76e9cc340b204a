//! Gateway - WebSocket listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket, runs the upgrade handshake for
//! each client and spawns a [`Connection`] task once it succeeds.

use crate::config::{LimitsConfig, ListenConfig};
use crate::network::Connection;
use crate::state::{ChatHandle, ConnectionIds};
use crate::telemetry::spans;
use chatrelay_proto::websocket::HandshakePolicy;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tracing::{Instrument, debug, error, info, instrument, warn};

/// The Gateway accepts incoming connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    policy: Arc<HandshakePolicy>,
    limits: LimitsConfig,
    chat: ChatHandle,
    ids: ConnectionIds,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        listen: &ListenConfig,
        limits: LimitsConfig,
        chat: ChatHandle,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        info!(address = %listen.address, "WebSocket listener bound");

        Ok(Self {
            listener,
            policy: Arc::new(listen.handshake_policy()),
            limits,
            chat,
            ids: ConnectionIds::new(),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the accept loop. Only returns if the listener itself fails.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let uid = self.ids.next();
                    debug!(%uid, %addr, "WebSocket connection attempt");

                    let policy = Arc::clone(&self.policy);
                    let chat = self.chat.clone();
                    let limits = self.limits.clone();
                    let span = spans::connection(&uid, &addr);

                    tokio::spawn(
                        async move {
                            let callback = |req: &Request, response: Response| {
                                let result = policy.apply(req, response);
                                if let Err(rejection) = &result {
                                    warn!(status = %rejection.status(), "WebSocket handshake rejected");
                                }
                                result
                            };

                            match accept_hdr_async(stream, callback).await {
                                Ok(ws_stream) => {
                                    info!("WebSocket handshake successful");
                                    let connection =
                                        Connection::new(uid, addr, ws_stream, chat, &limits);
                                    if let Err(e) = connection.run().await {
                                        error!(error = %e, "WebSocket connection error");
                                    }
                                    info!("WebSocket connection closed");
                                }
                                Err(e) => {
                                    debug!(error = %e, "WebSocket handshake failed");
                                }
                            }
                        }
                        .instrument(span),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Accept failed");
                }
            }
        }
    }
}
