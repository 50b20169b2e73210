//! Partitioned, append-only message ledger.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::model::MessageRecord;
use crate::error::{Result, TallyError};
use crate::group::GroupId;

/// All recorded messages, one ordered partition per group.
///
/// Serializes as `{"<group id>": [record, ...]}`, the `message_history.json`
/// document layout. Records are only ever pushed to the end of a partition;
/// a partition disappears as a whole when its group is removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLedger {
    partitions: BTreeMap<GroupId, Vec<MessageRecord>>,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty partition if none exists. Returns `true` if created.
    pub fn ensure_partition(&mut self, group_id: GroupId) -> bool {
        if self.partitions.contains_key(&group_id) {
            return false;
        }
        self.partitions.insert(group_id, Vec::new());
        true
    }

    /// Deletes a partition and everything in it.
    pub fn remove_partition(&mut self, group_id: &GroupId) -> Option<Vec<MessageRecord>> {
        self.partitions.remove(group_id)
    }

    pub fn has_partition(&self, group_id: &GroupId) -> bool {
        self.partitions.contains_key(group_id)
    }

    /// Appends a record to an existing partition.
    ///
    /// Whether a missing partition should be created is a membership policy
    /// decision made by the caller, so this fails with `UnknownGroup`.
    pub fn append(&mut self, group_id: GroupId, record: MessageRecord) -> Result<()> {
        let partition = self
            .partitions
            .get_mut(&group_id)
            .ok_or_else(|| TallyError::unknown_group(group_id))?;
        partition.push(record);
        Ok(())
    }

    pub fn partition(&self, group_id: &GroupId) -> Option<&[MessageRecord]> {
        self.partitions.get(group_id).map(Vec::as_slice)
    }

    /// Sequence number of the newest record in a partition (0 if empty).
    pub fn last_seq(&self, group_id: &GroupId) -> u64 {
        self.partitions
            .get(group_id)
            .and_then(|records| records.last())
            .map(MessageRecord::seq_or_zero)
            .unwrap_or(0)
    }

    /// Highest sequence number across all partitions.
    pub fn max_seq(&self) -> u64 {
        self.partitions
            .keys()
            .map(|id| self.last_seq(id))
            .max()
            .unwrap_or(0)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &GroupId> {
        self.partitions.keys()
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn total_records(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }
}
