//! Queue and frame size limits.

use serde::Deserialize;

/// Queue and frame size limits.
///
/// These keep a single slow or abusive client from backing up the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound queue depth per connection (default: 256).
    /// A recipient whose queue is full is disconnected.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
    /// Largest accepted inbound frame in bytes (default: 64 KiB).
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
    /// Chat actor mailbox capacity (default: 1024).
    #[serde(default = "default_chat_mailbox_capacity")]
    pub chat_mailbox_capacity: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sendq: default_sendq(),
            max_message_bytes: default_max_message_bytes(),
            chat_mailbox_capacity: default_chat_mailbox_capacity(),
        }
    }
}

fn default_sendq() -> usize {
    256
}

fn default_max_message_bytes() -> usize {
    64 * 1024
}

fn default_chat_mailbox_capacity() -> usize {
    1024
}
