//! Unified error handling for chatrelay.
//!
//! Handler errors never leave the chat actor: each inbound event runs
//! behind an isolation boundary that logs and counts the failure and moves
//! on to the next event.

use thiserror::Error;

/// Errors that can occur while handling an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Chat or typing event before `add-identity`.
    #[error("connection has not joined")]
    NotJoined,

    /// Second `add-identity` on one connection.
    #[error("connection already joined as {0}")]
    AlreadyJoined(String),

    /// Event for a connection the actor does not know (already detached).
    #[error("unknown connection: {0}")]
    UnknownConnection(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotJoined => "not_joined",
            Self::AlreadyJoined(_) => "already_joined",
            Self::UnknownConnection(_) => "unknown_connection",
        }
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// The chat actor has stopped and no longer accepts events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chat actor is no longer running")]
pub struct ActorClosed;
