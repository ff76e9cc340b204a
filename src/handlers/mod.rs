//! Chat command handlers.
//!
//! Inbound `new-message` text is either one of a handful of reserved slash
//! commands or ordinary chat. [`CommandInterpreter`] tells them apart and
//! produces the outbound line; [`TextTransformer`] rewrites ordinary chat
//! according to the sender's active modes.

mod command;
mod transform;

pub use command::CommandInterpreter;
pub use transform::TextTransformer;
