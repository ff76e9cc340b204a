//! State management module.
//!
//! All mutable chat state lives behind the [`ChatActor`]: the registry of
//! joined usernames, one [`Session`] per attached connection and the
//! recipient table of the [`BroadcastRouter`].

mod actor;
mod registry;
mod session;
mod uid;

pub use actor::{recipient_channel, ChatActor, ChatHandle, Inbox, Outbound};
pub use registry::ConnectionRegistry;
pub use session::{Mode, ModeState, Session};
pub use uid::{ConnectionIds, Uid};
