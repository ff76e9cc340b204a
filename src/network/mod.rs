//! Network module.
//!
//! Contains the Gateway (WebSocket listener) and the per-connection pump.

mod connection;
mod gateway;

pub use connection::Connection;
pub use gateway::Gateway;
