//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("limits.sendq must be at least 1")]
    ZeroSendq,
    #[error("limits.chat_mailbox_capacity must be at least 1")]
    ZeroMailbox,
    #[error("limits.max_message_bytes must be at least 1")]
    ZeroMessageLimit,
    #[error("chat.misspell_aggressiveness must be within [0, 1], got {0}")]
    AggressivenessOutOfRange(f64),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.limits.sendq == 0 {
        errors.push(ValidationError::ZeroSendq);
    }
    if config.limits.chat_mailbox_capacity == 0 {
        errors.push(ValidationError::ZeroMailbox);
    }
    if config.limits.max_message_bytes == 0 {
        errors.push(ValidationError::ZeroMessageLimit);
    }

    let aggressiveness = config.chat.misspell_aggressiveness;
    if !(0.0..=1.0).contains(&aggressiveness) {
        errors.push(ValidationError::AggressivenessOutOfRange(aggressiveness));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
