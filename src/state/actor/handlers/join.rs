//! `add-identity` handling.

use crate::error::{HandlerError, HandlerResult};
use crate::state::ChatActor;
use chatrelay_proto::{Login, Presence, ServerEvent};
use std::sync::Arc;
use tracing::{info, warn};

impl ChatActor {
    pub(crate) fn handle_join(&mut self, uid: &str, username: String) -> HandlerResult {
        let session = self
            .sessions
            .get_mut(uid)
            .ok_or_else(|| HandlerError::UnknownConnection(uid.to_string()))?;

        let joined = session.join(&mut self.registry, username.clone())?;
        if joined.name_taken {
            warn!(%uid, %username, "Username already in use");
        }
        let num_users = joined.num_users;
        info!(
            %uid,
            %username,
            num_users,
            distinct = self.registry.len(),
            "User joined"
        );

        self.router
            .to_self(uid, &Arc::new(ServerEvent::Login(Login { num_users })));
        self.router.to_others(
            uid,
            &Arc::new(ServerEvent::UserJoined(Presence {
                username,
                num_users,
            })),
        );
        crate::metrics::set_connected_users(num_users);
        Ok(())
    }
}
