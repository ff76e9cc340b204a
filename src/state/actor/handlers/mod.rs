//! Chat actor event handlers.
//!
//! Each submodule handles a category of [`ChatEvent`](super::ChatEvent)
//! messages processed by [`ChatActor`](super::ChatActor).

mod join;
mod lifecycle;
mod message;
