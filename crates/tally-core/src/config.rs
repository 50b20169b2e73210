//! Runtime configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default, so an absent or partial file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What to do with a message from a group that is not registered.
///
/// Join events can be missed (the bot was offline, or was added before
/// tracking started), so by default such groups are adopted using the
/// display name carried by the message itself.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownGroupPolicy {
    /// Register the group and create its partition.
    #[default]
    Adopt,
    /// Drop the message.
    Reject,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct JournalSettings {
    /// Number of journal entries after which the documents are rewritten and
    /// the journal emptied. 0 rewrites the documents on every mutation.
    pub compact_after: usize,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self { compact_after: 256 }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct MembershipSettings {
    pub unknown_group: UnknownGroupPolicy,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TallyConfig {
    /// Directory holding the ledger documents. Falls back to the platform
    /// data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub journal: JournalSettings,
    pub membership: MembershipSettings,
}
