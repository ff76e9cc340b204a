//! Connection attach and detach.

use crate::state::actor::Recipient;
use crate::state::{ChatActor, Session, Uid};
use chatrelay_proto::{Presence, ServerEvent};
use std::sync::Arc;
use tracing::{debug, info};

impl ChatActor {
    pub(crate) fn handle_attach(&mut self, uid: Uid, recipient: Recipient) {
        debug!(%uid, connections = self.router.len() + 1, "Connection attached");
        self.router.attach(uid.clone(), recipient);
        self.sessions.insert(uid.clone(), Session::new(uid));
        crate::metrics::connection_opened();
    }

    /// Tear down a connection. Runs at most once per uid; later calls are
    /// no-ops.
    pub(crate) fn handle_detach(&mut self, uid: &str) {
        self.router.detach(uid);
        let Some(mut session) = self.sessions.remove(uid) else {
            return;
        };
        crate::metrics::connection_closed();

        let Some((username, num_users)) = session.leave(&mut self.registry) else {
            debug!(uid = session.uid(), "Connection closed before joining");
            return;
        };
        info!(%uid, %username, num_users, "User left");

        self.router.to_others(
            uid,
            &Arc::new(ServerEvent::UserLeft(Presence {
                username,
                num_users,
            })),
        );
        crate::metrics::set_connected_users(num_users);
    }
}
