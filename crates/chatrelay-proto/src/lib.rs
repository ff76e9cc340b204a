//! # chatrelay-proto
//!
//! Wire vocabulary for the chatrelay event protocol.
//!
//! Every WebSocket text frame carries one JSON envelope:
//!
//! ```text
//! {"event": "<name>", "data": <payload>}
//! ```
//!
//! `data` is omitted for events that carry no payload (`typing`,
//! `stop-typing`).
//!
//! ## Quick Start
//!
//! ```rust
//! use chatrelay_proto::{ClientEvent, ServerEvent, ChatMessage};
//! use chatrelay_proto::frame::{decode_client_frame, encode_server_frame};
//!
//! let event = decode_client_frame(r#"{"event":"new-message","data":"hi"}"#, 1024).unwrap();
//! assert_eq!(event, ClientEvent::NewMessage("hi".to_string()));
//!
//! let reply = ServerEvent::NewMessage(ChatMessage::new("alice", "hi"));
//! let json = encode_server_frame(&reply).unwrap();
//! assert_eq!(json, r#"{"event":"new-message","data":{"username":"alice","message":"hi"}}"#);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod event;
pub mod frame;
#[cfg(feature = "tokio")]
pub mod websocket;

pub use error::ProtocolError;
pub use event::{ChatMessage, ClientEvent, Login, Presence, ServerEvent, TypingNotice};
