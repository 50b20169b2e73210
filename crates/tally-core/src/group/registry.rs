//! Group registry: group id → display name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::GroupId;

/// Registry of the groups the bot is currently a member of.
///
/// Serializes as a flat JSON object (`{"<group id>": "<display name>"}`),
/// which is the `group_names.json` document layout.
///
/// The registry itself does not touch the ledger. Keeping the two coupled is
/// the job of [`crate::tracker::Tracker`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRegistry {
    groups: BTreeMap<GroupId, String>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or renames a group. Returns `true` if the group was not
    /// registered before.
    pub fn upsert(&mut self, group_id: GroupId, display_name: impl Into<String>) -> bool {
        self.groups.insert(group_id, display_name.into()).is_none()
    }

    /// Removes a group. Returns its display name if it was registered.
    pub fn remove(&mut self, group_id: &GroupId) -> Option<String> {
        self.groups.remove(group_id)
    }

    pub fn contains(&self, group_id: &GroupId) -> bool {
        self.groups.contains_key(group_id)
    }

    pub fn display_name(&self, group_id: &GroupId) -> Option<&str> {
        self.groups.get(group_id).map(String::as_str)
    }

    /// Lists all groups in numeric id order.
    pub fn list(&self) -> Vec<(GroupId, &str)> {
        self.groups
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &GroupId> {
        self.groups.keys()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
