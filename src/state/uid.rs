//! Connection ids.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a connection.
pub type Uid = String;

/// Hands out connection ids: the decimal form of a process-wide counter,
/// starting at 1.
#[derive(Debug, Default)]
pub struct ConnectionIds {
    last: AtomicU64,
}

impl ConnectionIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Uid {
        (self.last.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
