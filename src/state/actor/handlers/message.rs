//! `new-message` and typing indicator handling.

use crate::error::{HandlerError, HandlerResult};
use crate::state::ChatActor;
use chatrelay_proto::{ServerEvent, TypingNotice};
use std::sync::Arc;

impl ChatActor {
    /// Interpret a chat line and deliver the result.
    ///
    /// Every connection except the sender is queued first, then the sender,
    /// all sharing one payload.
    pub(crate) fn handle_message(&mut self, uid: &str, text: &str) -> HandlerResult {
        let session = self
            .sessions
            .get_mut(uid)
            .ok_or_else(|| HandlerError::UnknownConnection(uid.to_string()))?;

        let (command, message) = self.interpreter.interpret(session, text, &mut self.rng)?;
        crate::metrics::record_chat_command(command.name());

        let outbound = Arc::new(ServerEvent::NewMessage(message));
        self.router.to_others(uid, &outbound);
        self.router.to_self(uid, &outbound);
        Ok(())
    }

    /// Relay a typing indicator to everyone but the sender.
    pub(crate) fn handle_typing(&mut self, uid: &str, typing: bool) -> HandlerResult {
        let session = self
            .sessions
            .get(uid)
            .ok_or_else(|| HandlerError::UnknownConnection(uid.to_string()))?;

        let notice = TypingNotice {
            username: session.require_username()?.to_string(),
        };
        let event = if typing {
            ServerEvent::Typing(notice)
        } else {
            ServerEvent::StopTyping(notice)
        };
        self.router.to_others(uid, &Arc::new(event));
        Ok(())
    }
}
