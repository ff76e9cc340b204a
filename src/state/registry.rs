//! Registry of joined usernames.

use std::collections::HashSet;

/// Process-wide table of joined usernames and the joined-user count.
///
/// Usernames are not checked for uniqueness. Joining with a name that is
/// already present overwrites the entry but still increments the count, so
/// `num_users` only matches the table size while names are unique.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    usernames: HashSet<String>,
    num_users: usize,
}

impl ConnectionRegistry {
    /// Record a join. Returns the new user count.
    pub fn join(&mut self, username: &str) -> usize {
        self.usernames.insert(username.to_string());
        self.num_users += 1;
        self.num_users
    }

    /// Record a leave. Returns the new user count.
    pub fn leave(&mut self, username: &str) -> usize {
        self.usernames.remove(username);
        self.num_users = self.num_users.saturating_sub(1);
        self.num_users
    }

    /// Joined-user count.
    pub fn num_users(&self) -> usize {
        self.num_users
    }

    pub fn contains(&self, username: &str) -> bool {
        self.usernames.contains(username)
    }

    /// Number of distinct usernames in the table.
    pub fn len(&self) -> usize {
        self.usernames.len()
    }
}
