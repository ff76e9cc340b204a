//! Fan-out of outbound events to attached connections.
//!
//! Delivery never blocks the actor: each recipient has a bounded queue and
//! a recipient whose queue is full is dropped from the table. Dropping a
//! [`Recipient`] fires its hang-up signal, so the connection task stops even
//! while it is stuck writing to a peer that no longer reads. Evicted uids
//! are buffered until the actor reaps them with [`BroadcastRouter::take_evicted`].

use super::types::Recipient;
use super::Outbound;
use crate::state::Uid;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

enum Delivery {
    Sent,
    Overflow,
    Closed,
}

fn deliver(sender: &mpsc::Sender<Outbound>, event: &Outbound) -> Delivery {
    match sender.try_send(Arc::clone(event)) {
        Ok(()) => Delivery::Sent,
        Err(TrySendError::Full(_)) => Delivery::Overflow,
        Err(TrySendError::Closed(_)) => Delivery::Closed,
    }
}

/// Recipient table plus the three audience selectors.
#[derive(Debug, Default)]
pub struct BroadcastRouter {
    recipients: HashMap<Uid, Recipient>,
    evicted: Vec<Uid>,
}

impl BroadcastRouter {
    pub fn attach(&mut self, uid: Uid, recipient: Recipient) {
        self.recipients.insert(uid, recipient);
    }

    /// Remove a recipient. Returns whether it was attached.
    pub fn detach(&mut self, uid: &str) -> bool {
        self.recipients.remove(uid).is_some()
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    /// Deliver to every attached connection except `origin`.
    /// Returns the number of recipients reached.
    pub fn to_others(&mut self, origin: &str, event: &Outbound) -> usize {
        self.fan_out(event, |uid| uid != origin)
    }

    /// Deliver only to `origin`. Returns whether it was reached.
    pub fn to_self(&mut self, origin: &str, event: &Outbound) -> bool {
        let Some(recipient) = self.recipients.get(origin) else {
            return false;
        };
        match deliver(&recipient.queue, event) {
            Delivery::Sent => true,
            Delivery::Overflow => {
                self.evict(origin);
                false
            }
            Delivery::Closed => false,
        }
    }

    /// Deliver to every attached connection. Returns the number reached.
    pub fn to_all(&mut self, event: &Outbound) -> usize {
        self.fan_out(event, |_| true)
    }

    fn fan_out(&mut self, event: &Outbound, include: impl Fn(&str) -> bool) -> usize {
        let mut reached = 0;
        let mut overflowed = Vec::new();

        for (uid, recipient) in &self.recipients {
            if !include(uid) {
                continue;
            }
            match deliver(&recipient.queue, event) {
                Delivery::Sent => reached += 1,
                Delivery::Overflow => overflowed.push(uid.clone()),
                Delivery::Closed => {}
            }
        }

        for uid in overflowed {
            self.evict(&uid);
        }

        crate::metrics::record_fanout(reached);
        reached
    }

    /// Drain the uids evicted since the last call, oldest first.
    pub fn take_evicted(&mut self) -> Vec<Uid> {
        std::mem::take(&mut self.evicted)
    }

    fn evict(&mut self, uid: &str) {
        if self.recipients.remove(uid).is_some() {
            warn!(%uid, "SendQ exceeded, dropping connection");
            crate::metrics::record_message_dropped();
            self.evicted.push(uid.to_string());
        }
    }
}
