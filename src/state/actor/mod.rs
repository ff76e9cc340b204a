//! The chat actor.
//!
//! All chat state lives in one Tokio task: the session table, the username
//! registry and the recipient table. Connection tasks never touch that
//! state directly. They submit [`ChatEvent`]s through a [`ChatHandle`] and
//! receive [`Outbound`] events on their own bounded queue.
//!
//! # Architecture
//!
//! - **State Ownership**: [`ChatActor`] owns every [`Session`] and the
//!   [`ConnectionRegistry`], so joins, leaves and user counts never race.
//! - **Ordering**: events are processed one at a time in mailbox order. A
//!   broadcast is fully queued to every recipient before the next event
//!   starts, so all connections observe the same relative order.
//! - **Isolation**: a failing event is logged and counted; the actor keeps
//!   running.
//! - **Eviction**: a connection dropped for a full queue is torn down in
//!   the same event that overflowed it, so its user-left is announced
//!   before anything else happens.

use crate::handlers::CommandInterpreter;
use crate::state::{ConnectionRegistry, Session, Uid};
use crate::telemetry::EventTimer;
use chatrelay_proto::ClientEvent;
use rand::rngs::StdRng;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

mod broadcast;
mod handlers;
mod types;

pub use broadcast::BroadcastRouter;
pub use types::{recipient_channel, ChatEvent, ChatHandle, Inbox, Outbound, Recipient};

/// Owner of all shared chat state.
pub struct ChatActor {
    sessions: HashMap<Uid, Session>,
    registry: ConnectionRegistry,
    router: BroadcastRouter,
    interpreter: CommandInterpreter,
    rng: StdRng,
}

impl ChatActor {
    pub fn new(interpreter: CommandInterpreter, rng: StdRng) -> Self {
        Self {
            sessions: HashMap::new(),
            registry: ConnectionRegistry::default(),
            router: BroadcastRouter::default(),
            interpreter,
            rng,
        }
    }

    /// Spawn the actor on the current runtime and return its handle.
    ///
    /// The actor stops once every handle has been dropped.
    pub fn spawn(self, mailbox_capacity: usize) -> ChatHandle {
        let (tx, rx) = mpsc::channel(mailbox_capacity);
        tokio::spawn(self.run(rx));
        ChatHandle::new(tx)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<ChatEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        let joined = self.sessions.values().filter(|s| s.is_joined()).count();
        info!(
            sessions = self.sessions.len(),
            joined,
            num_users = self.num_users(),
            "Chat actor stopped"
        );
    }

    /// Process one event to completion.
    pub fn handle_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Attach { uid, recipient } => self.handle_attach(uid, recipient),
            ChatEvent::Inbound { uid, event } => {
                let name = event.name();
                let _timer = EventTimer::new(name);
                if let Err(e) = self.dispatch(&uid, event) {
                    debug!(%uid, event = name, error = %e, "Event rejected");
                    crate::metrics::record_event_error(name, e.error_code());
                }
            }
            ChatEvent::Detach { uid } => self.handle_detach(&uid),
        }
        self.reap_evicted();
    }

    /// Detach every connection the router dropped. Announcing a departure
    /// can overflow further queues, so keep going until none are left.
    fn reap_evicted(&mut self) {
        loop {
            let evicted = self.router.take_evicted();
            if evicted.is_empty() {
                break;
            }
            for uid in evicted {
                self.handle_detach(&uid);
            }
        }
    }

    fn dispatch(&mut self, uid: &str, event: ClientEvent) -> crate::error::HandlerResult {
        match event {
            ClientEvent::AddIdentity(username) => self.handle_join(uid, username),
            ClientEvent::NewMessage(text) => self.handle_message(uid, &text),
            ClientEvent::Typing => self.handle_typing(uid, true),
            ClientEvent::StopTyping => self.handle_typing(uid, false),
        }
    }

    /// Joined-user count.
    pub fn num_users(&self) -> usize {
        self.registry.num_users()
    }
}
