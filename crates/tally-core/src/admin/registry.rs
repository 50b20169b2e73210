use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Platform user identifier.
pub type UserId = i64;

/// Set of users allowed to list groups and run queries.
///
/// Serialized as a JSON array (`admin_users.json`). There is no revocation;
/// the set only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminRegistry {
    users: BTreeSet<UserId>,
}

impl AdminRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user. Returns `true` if the user was not already authorized.
    pub fn authorize(&mut self, user_id: UserId) -> bool {
        self.users.insert(user_id)
    }

    /// Fails closed: anyone not explicitly added is denied.
    pub fn is_authorized(&self, user_id: UserId) -> bool {
        self.users.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
