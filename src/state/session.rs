//! Per-connection session state.
//!
//! A [`Session`] lives from transport attach to disconnect. It becomes
//! *joined* once `add-identity` succeeds; only joined sessions chat, carry
//! meaningful modes, and count in the registry.

use crate::error::HandlerError;
use crate::state::{ConnectionRegistry, Uid};

/// Text modes a connection can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Append a fixed suffix to every line.
    Obnoxious,
    /// Scramble the interior of every word.
    Misspell,
}

impl Mode {
    /// Name as used in the command literal (`/obnoxious`, `/misspell`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Obnoxious => "obnoxious",
            Self::Misspell => "misspell",
        }
    }
}

/// Per-connection mode flags. Both start off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    pub obnoxious: bool,
    pub misspell: bool,
}

impl ModeState {
    /// Flip `mode`. Returns the new value.
    pub fn toggle(&mut self, mode: Mode) -> bool {
        let flag = match mode {
            Mode::Obnoxious => &mut self.obnoxious,
            Mode::Misspell => &mut self.misspell,
        };
        *flag = !*flag;
        *flag
    }
}

/// Outcome of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joined {
    /// Joined-user count after this join.
    pub num_users: usize,
    /// Another connection already holds the username.
    pub name_taken: bool,
}

/// Identity and modes of one connection.
#[derive(Debug)]
pub struct Session {
    uid: Uid,
    /// Set by a successful join; `Some` means joined.
    username: Option<String>,
    modes: ModeState,
}

impl Session {
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            username: None,
            modes: ModeState::default(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_joined(&self) -> bool {
        self.username.is_some()
    }

    /// The joined username, or [`HandlerError::NotJoined`].
    pub fn require_username(&self) -> Result<&str, HandlerError> {
        self.username().ok_or(HandlerError::NotJoined)
    }

    pub fn modes(&self) -> ModeState {
        self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeState {
        &mut self.modes
    }

    /// Join as `username`.
    ///
    /// A session joins at most once; a rejected rejoin leaves the registry
    /// untouched.
    pub fn join(
        &mut self,
        registry: &mut ConnectionRegistry,
        username: String,
    ) -> Result<Joined, HandlerError> {
        if let Some(current) = &self.username {
            return Err(HandlerError::AlreadyJoined(current.clone()));
        }
        let name_taken = registry.contains(&username);
        let num_users = registry.join(&username);
        self.username = Some(username);
        Ok(Joined {
            num_users,
            name_taken,
        })
    }

    /// Undo the join, if any. Returns the departed username and the new
    /// user count; `None` when the session never joined.
    pub fn leave(&mut self, registry: &mut ConnectionRegistry) -> Option<(String, usize)> {
        let username = self.username.take()?;
        let num_users = registry.leave(&username);
        Some((username, num_users))
    }
}
