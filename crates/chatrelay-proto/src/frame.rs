//! JSON frame codec.
//!
//! One frame is one WebSocket text message holding one event envelope.

use crate::error::{ProtocolError, Result};
use crate::event::{ClientEvent, ServerEvent};
use serde_json::Value;

/// Decode an inbound text frame.
///
/// Frames longer than `limit` bytes are rejected before parsing. Event names
/// are checked against [`ClientEvent::NAMES`] so that an unsupported event is
/// reported as [`ProtocolError::UnknownEvent`] rather than a generic JSON error.
pub fn decode_client_frame(text: &str, limit: usize) -> Result<ClientEvent> {
    if text.len() > limit {
        return Err(ProtocolError::FrameTooLong {
            len: text.len(),
            limit,
        });
    }

    let value: Value = serde_json::from_str(text)?;
    let name = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingEvent)?;
    if !ClientEvent::is_known(name) {
        return Err(ProtocolError::UnknownEvent(name.to_string()));
    }

    Ok(serde_json::from_value(value)?)
}

/// Encode an outbound event as a text frame.
pub fn encode_server_frame(event: &ServerEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Encode an inbound event as a text frame. Used by clients.
pub fn encode_client_frame(event: &ClientEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Decode an outbound text frame. Used by clients.
pub fn decode_server_frame(text: &str) -> Result<ServerEvent> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChatMessage, Login};

    const LIMIT: usize = 4096;

    #[test]
    fn decodes_payload_events() {
        assert_eq!(
            decode_client_frame(r#"{"event":"add-identity","data":"alice"}"#, LIMIT).unwrap(),
            ClientEvent::AddIdentity("alice".into())
        );
        assert_eq!(
            decode_client_frame(r#"{"data":"/flipcoin","event":"new-message"}"#, LIMIT).unwrap(),
            ClientEvent::NewMessage("/flipcoin".into())
        );
    }

    #[test]
    fn decodes_unit_events_with_or_without_data() {
        assert_eq!(
            decode_client_frame(r#"{"event":"typing"}"#, LIMIT).unwrap(),
            ClientEvent::Typing
        );
        assert_eq!(
            decode_client_frame(r#"{"event":"stop-typing","data":null}"#, LIMIT).unwrap(),
            ClientEvent::StopTyping
        );
    }

    #[test]
    fn accepts_legacy_spaced_names() {
        assert_eq!(
            decode_client_frame(r#"{"event":"add user","data":"bob"}"#, LIMIT).unwrap(),
            ClientEvent::AddIdentity("bob".into())
        );
        assert_eq!(
            decode_client_frame(r#"{"event":"new message","data":"hey"}"#, LIMIT).unwrap(),
            ClientEvent::NewMessage("hey".into())
        );
        assert_eq!(
            decode_client_frame(r#"{"event":"stop typing"}"#, LIMIT).unwrap(),
            ClientEvent::StopTyping
        );
    }

    #[test]
    fn message_text_is_not_trimmed() {
        assert_eq!(
            decode_client_frame(r#"{"event":"new-message","data":" /flipcoin "}"#, LIMIT)
                .unwrap(),
            ClientEvent::NewMessage(" /flipcoin ".into())
        );
    }

    #[test]
    fn rejects_unknown_event() {
        let err = decode_client_frame(r#"{"event":"login","data":{"numUsers":1}}"#, LIMIT)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownEvent(ref name) if name == "login"));
        assert_eq!(err.error_code(), "unknown_event");
    }

    #[test]
    fn rejects_missing_event_name() {
        let err = decode_client_frame(r#"{"data":"x"}"#, LIMIT).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingEvent));
        let err = decode_client_frame(r#"["new-message","x"]"#, LIMIT).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingEvent));
    }

    #[test]
    fn rejects_wrong_payload_shape() {
        let err = decode_client_frame(r#"{"event":"new-message","data":42}"#, LIMIT).unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
        let err = decode_client_frame(r#"{"event":"add-identity"}"#, LIMIT).unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode_client_frame("hello", LIMIT).unwrap_err();
        assert_eq!(err.error_code(), "malformed_frame");
    }

    #[test]
    fn rejects_oversized_frame() {
        let text = format!(r#"{{"event":"new-message","data":"{}"}}"#, "x".repeat(64));
        let err = decode_client_frame(&text, 32).unwrap_err();
        assert!(matches!(err, ProtocolError::FrameTooLong { limit: 32, .. }));
    }

    #[test]
    fn server_frames_decode_back() {
        let event = ServerEvent::Login(Login { num_users: 3 });
        let text = encode_server_frame(&event).unwrap();
        assert_eq!(text, r#"{"event":"login","data":{"numUsers":3}}"#);
        assert_eq!(decode_server_frame(&text).unwrap(), event);

        let event = ServerEvent::NewMessage(ChatMessage::new("System", "User @a toggles /misspell mode"));
        let text = encode_server_frame(&event).unwrap();
        assert_eq!(decode_server_frame(&text).unwrap(), event);
    }
}
