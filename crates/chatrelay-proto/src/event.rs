//! Inbound and outbound protocol events.
//!
//! Both directions use the same adjacently tagged envelope: the variant
//! name travels in `event`, its payload in `data`.

use serde::{Deserialize, Serialize};

/// Events a client may send to the relay.
///
/// The `disconnect` event of the protocol has no frame representation: it is
/// raised by the transport when the socket closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Register the display identity for this connection.
    #[serde(rename = "add-identity", alias = "add user")]
    AddIdentity(String),
    /// Chat text or a slash command.
    #[serde(rename = "new-message", alias = "new message")]
    NewMessage(String),
    /// The user started typing.
    #[serde(rename = "typing")]
    Typing,
    /// The user stopped typing.
    #[serde(rename = "stop-typing", alias = "stop typing")]
    StopTyping,
}

impl ClientEvent {
    /// Every event name accepted on the wire, legacy spellings included.
    pub const NAMES: &'static [&'static str] = &[
        "add-identity",
        "add user",
        "new-message",
        "new message",
        "typing",
        "stop-typing",
        "stop typing",
    ];

    /// Canonical wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddIdentity(_) => "add-identity",
            Self::NewMessage(_) => "new-message",
            Self::Typing => "typing",
            Self::StopTyping => "stop-typing",
        }
    }

    /// Whether `name` is an inbound event this protocol understands.
    pub fn is_known(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }
}

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A chat line, either user text or `System` command feedback.
    NewMessage(ChatMessage),
    /// Private acknowledgment of a successful join.
    Login(Login),
    /// Someone joined.
    UserJoined(Presence),
    /// Someone left.
    UserLeft(Presence),
    /// Someone started typing.
    Typing(TypingNotice),
    /// Someone stopped typing.
    StopTyping(TypingNotice),
}

impl ServerEvent {
    /// Canonical wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "new-message",
            Self::Login(_) => "login",
            Self::UserJoined(_) => "user-joined",
            Self::UserLeft(_) => "user-left",
            Self::Typing(_) => "typing",
            Self::StopTyping(_) => "stop-typing",
        }
    }
}

/// Payload of `new-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author identity.
    pub username: String,
    /// Message body after any transforms.
    pub message: String,
}

impl ChatMessage {
    /// Build a message from an author and a body.
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
        }
    }
}

/// Payload of `login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Joined users after this join.
    pub num_users: usize,
}

/// Payload of `user-joined` and `user-left`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    /// Identity that joined or left.
    pub username: String,
    /// Joined users after the change.
    pub num_users: usize,
}

/// Payload of `typing` and `stop-typing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingNotice {
    /// Identity that is (or stopped) typing.
    pub username: String,
}
