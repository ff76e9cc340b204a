//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig) and loading
//! - [`listen`]: WebSocket listener configuration (ListenConfig)
//! - [`limits`]: Queue and frame size limits (LimitsConfig)
//! - [`chat`]: Chat behavior tuning (ChatConfig)
//! - [`validation`]: Startup validation

mod chat;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::Config;
pub use validation::validate;
