//! Events and handles for the chat actor.

use crate::error::ActorClosed;
use crate::state::Uid;
use chatrelay_proto::{ClientEvent, ServerEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One outbound event, shared between every recipient of a broadcast.
pub type Outbound = Arc<ServerEvent>;

/// The actor's end of a connection: its outbound queue plus a hang-up
/// signal that fires as soon as the actor drops the recipient.
#[derive(Debug)]
pub struct Recipient {
    pub(super) queue: mpsc::Sender<Outbound>,
    _hangup: oneshot::Sender<()>,
}

/// The connection's end: outbound events and the hang-up signal.
#[derive(Debug)]
pub struct Inbox {
    pub events: mpsc::Receiver<Outbound>,
    /// Resolves (with an error) once the actor no longer delivers to this
    /// connection.
    pub hangup: oneshot::Receiver<()>,
}

/// Create a linked recipient/inbox pair with room for `capacity` events.
pub fn recipient_channel(capacity: usize) -> (Recipient, Inbox) {
    let (queue, events) = mpsc::channel(capacity);
    let (hangup_tx, hangup) = oneshot::channel();
    (
        Recipient {
            queue,
            _hangup: hangup_tx,
        },
        Inbox { events, hangup },
    )
}

/// Events that can be sent to the chat actor.
#[derive(Debug)]
pub enum ChatEvent {
    /// A transport connection opened.
    Attach { uid: Uid, recipient: Recipient },
    /// A decoded frame from a connection.
    Inbound { uid: Uid, event: ClientEvent },
    /// The transport connection closed.
    Detach { uid: Uid },
}

/// Cloneable handle for submitting events to the chat actor.
///
/// Sends wait for mailbox space, so a flood from one connection slows that
/// connection's reader rather than growing memory.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    tx: mpsc::Sender<ChatEvent>,
}

impl ChatHandle {
    pub fn new(tx: mpsc::Sender<ChatEvent>) -> Self {
        Self { tx }
    }

    pub async fn attach(&self, uid: Uid, recipient: Recipient) -> Result<(), ActorClosed> {
        self.send(ChatEvent::Attach { uid, recipient }).await
    }

    pub async fn inbound(&self, uid: Uid, event: ClientEvent) -> Result<(), ActorClosed> {
        self.send(ChatEvent::Inbound { uid, event }).await
    }

    pub async fn detach(&self, uid: Uid) -> Result<(), ActorClosed> {
        self.send(ChatEvent::Detach { uid }).await
    }

    async fn send(&self, event: ChatEvent) -> Result<(), ActorClosed> {
        self.tx.send(event).await.map_err(|_| ActorClosed)
    }
}
