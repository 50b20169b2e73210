use serde::{Deserialize, Serialize};

use crate::group::GroupId;
use crate::message::MessageRecord;

/// One journaled mutation. Serialized as a single JSON line tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalEntry {
    /// Bot joined a group (or the group was re-announced).
    Joined {
        seq: u64,
        group: GroupId,
        name: String,
    },
    /// Bot left a group; its partition is gone.
    Left { seq: u64, group: GroupId },
    /// A message was recorded. `name` refreshes the group's display name.
    Appended {
        seq: u64,
        group: GroupId,
        name: String,
        record: MessageRecord,
    },
}

impl JournalEntry {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Joined { seq, .. } | Self::Left { seq, .. } | Self::Appended { seq, .. } => *seq,
        }
    }

    pub fn group(&self) -> GroupId {
        match self {
            Self::Joined { group, .. } | Self::Left { group, .. } | Self::Appended { group, .. } => {
                *group
            }
        }
    }
}
