//! Error types for the chatrelay wire protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while decoding or encoding a frame.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The frame exceeds the configured size limit.
    #[error("frame too long: {len} bytes (limit {limit})")]
    FrameTooLong {
        /// Size of the offending frame in bytes.
        len: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The frame is not a JSON object with a string `event` field.
    #[error("frame has no event name")]
    MissingEvent,

    /// The event name is not part of the protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The frame is not valid JSON, or its payload has the wrong shape.
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtocolError {
    /// Static label for metrics and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FrameTooLong { .. } => "frame_too_long",
            Self::MissingEvent => "missing_event",
            Self::UnknownEvent(_) => "unknown_event",
            Self::Json(_) => "malformed_frame",
        }
    }
}
