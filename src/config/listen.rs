//! WebSocket listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

use super::types::DEFAULT_PORT;

/// WebSocket listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:3000").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
    /// Allowed origins for the upgrade request (e.g., `["https://example.com"]`).
    /// Empty list allows all origins.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    /// Reject upgrades that carry no Origin header.
    #[serde(default)]
    pub require_origin: bool,
    /// Subprotocol to select when a client offers it.
    pub subprotocol: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            allow_origins: Vec::new(),
            require_origin: false,
            subprotocol: None,
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

impl ListenConfig {
    /// Handshake policy derived from this listener's settings.
    pub fn handshake_policy(&self) -> chatrelay_proto::websocket::HandshakePolicy {
        chatrelay_proto::websocket::HandshakePolicy {
            allowed_origins: self.allow_origins.clone(),
            require_origin: self.require_origin,
            subprotocol: self.subprotocol.clone(),
            enable_cors: !self.allow_origins.is_empty(),
        }
    }
}
