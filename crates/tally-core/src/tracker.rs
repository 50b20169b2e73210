//! The ledger store object.
//!
//! `Tracker` owns the group registry, the admin registry and the message
//! ledger together with a persistence handle. All core operations go through
//! it; it is opened once at startup and driven by one event at a time.

use tracing::{debug, error, info, warn};

use crate::admin::{AdminRegistry, UserId};
use crate::config::{TallyConfig, UnknownGroupPolicy};
use crate::error::{Result, TallyError};
use crate::group::{GroupId, GroupRegistry};
use crate::journal::{self, JournalEntry};
use crate::message::{MessageLedger, MessageRecord};
use crate::query::{self, CountQuery};
use crate::repository::{LedgerRepository, Snapshot};

/// Tunables taken from [`TallyConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    pub compact_after: usize,
    pub unknown_group: UnknownGroupPolicy,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self::from(&TallyConfig::default())
    }
}

impl From<&TallyConfig> for TrackerOptions {
    fn from(config: &TallyConfig) -> Self {
        Self {
            compact_after: config.journal.compact_after,
            unknown_group: config.membership.unknown_group,
        }
    }
}

/// Explicit store for the ledger state.
///
/// Mutations are applied in memory first and then made durable. If the
/// durable write fails the in-memory change stands and `TallyError::Io` is
/// returned, so the caller can log it; the next successful compaction
/// writes the full state again.
///
/// Invariant: a group is in the registry if and only if it has a ledger
/// partition. Every registry/partition change is a single journal entry.
pub struct Tracker<R: LedgerRepository> {
    repository: R,
    options: TrackerOptions,
    groups: GroupRegistry,
    ledger: MessageLedger,
    admins: AdminRegistry,
    next_seq: u64,
    /// Journal entries written since the last compaction.
    pending: usize,
}

impl<R: LedgerRepository> Tracker<R> {
    /// Loads the stored documents and replays the journal over them.
    ///
    /// A non-empty journal is compacted right away. Failure to do so is
    /// logged; the journal then stays in place for the next attempt.
    pub fn open(repository: R, options: TrackerOptions) -> Self {
        let Snapshot {
            mut ledger,
            mut groups,
            admins,
            journal,
        } = repository.load_snapshot();

        let stats = journal::replay(&journal, &mut groups, &mut ledger);
        let next_seq = stats.last_seq.max(ledger.max_seq()) + 1;

        info!(
            groups = groups.len(),
            messages = ledger.total_records(),
            admins = admins.len(),
            replayed = stats.applied,
            skipped = stats.skipped,
            "Ledger opened"
        );

        let mut tracker = Self {
            repository,
            options,
            groups,
            ledger,
            admins,
            next_seq,
            pending: journal.len(),
        };
        tracker.warn_on_mismatch();

        if tracker.pending > 0 {
            if let Err(e) = tracker.compact() {
                error!(error = %e, "Failed to compact journal on open");
            }
        }
        tracker
    }

    // ============================================================================
    // Group registry
    // ============================================================================

    /// Registers (or renames) a group and creates its empty partition.
    pub fn on_join(&mut self, group_id: GroupId, display_name: impl Into<String>) -> Result<()> {
        let name = display_name.into();
        info!(group_id = %group_id, name = %name, "Joined group");
        let entry = JournalEntry::Joined {
            seq: self.take_seq(),
            group: group_id,
            name,
        };
        self.apply_and_commit(entry)
    }

    /// Forgets a group and deletes its whole message history.
    ///
    /// Returns `Ok(false)` without touching storage if the group was not
    /// registered.
    pub fn on_leave(&mut self, group_id: GroupId) -> Result<bool> {
        if !self.groups.contains(&group_id) {
            debug!(group_id = %group_id, "Leave for unregistered group ignored");
            return Ok(false);
        }
        info!(group_id = %group_id, "Left group, discarding its history");
        let entry = JournalEntry::Left {
            seq: self.take_seq(),
            group: group_id,
        };
        self.apply_and_commit(entry)?;
        Ok(true)
    }

    pub fn list_groups(&self) -> Vec<(GroupId, &str)> {
        self.groups.list()
    }

    // ============================================================================
    // Message ledger
    // ============================================================================

    /// Appends a message to its group's partition and refreshes the group's
    /// display name.
    ///
    /// Messages from unregistered groups follow the configured
    /// [`UnknownGroupPolicy`].
    pub fn record_message(
        &mut self,
        group_id: GroupId,
        display_name: impl Into<String>,
        record: MessageRecord,
    ) -> Result<()> {
        if !self.groups.contains(&group_id) {
            match self.options.unknown_group {
                UnknownGroupPolicy::Reject => {
                    warn!(group_id = %group_id, "Dropping message from unregistered group");
                    return Err(TallyError::unknown_group(group_id));
                }
                UnknownGroupPolicy::Adopt => {
                    warn!(group_id = %group_id, "Adopting unregistered group from message");
                }
            }
        }

        let entry = JournalEntry::Appended {
            seq: self.take_seq(),
            group: group_id,
            name: display_name.into(),
            record,
        };
        self.apply_and_commit(entry)
    }

    /// Counts a user's messages in a group over an inclusive date range.
    pub fn count(&self, query: &CountQuery) -> Result<usize> {
        query::count_messages(&self.ledger, &self.groups, query)
    }

    // ============================================================================
    // Admin registry
    // ============================================================================

    /// Adds a user to the allow-list and persists it. Returns `true` if the
    /// user was newly added.
    pub fn authorize(&mut self, user_id: UserId) -> Result<bool> {
        let added = self.admins.authorize(user_id);
        if added {
            info!(user_id, "User authorized");
        }
        self.repository.save_admins(&self.admins)?;
        Ok(added)
    }

    pub fn is_authorized(&self, user_id: UserId) -> bool {
        self.admins.is_authorized(user_id)
    }

    // ============================================================================
    // Persistence
    // ============================================================================

    /// Writes the ledger and registry documents from memory, then empties
    /// the journal.
    pub fn compact(&mut self) -> Result<()> {
        self.repository.save_ledger(&self.ledger)?;
        self.repository.save_groups(&self.groups)?;
        self.repository.reset_journal()?;
        debug!(entries = self.pending, "Journal compacted");
        self.pending = 0;
        Ok(())
    }

    fn apply_and_commit(&mut self, entry: JournalEntry) -> Result<()> {
        journal::apply(&entry, &mut self.groups, &mut self.ledger);
        self.repository.append_journal(&entry)?;
        self.pending += 1;
        if self.pending >= self.options.compact_after.max(1) {
            self.compact()?;
        }
        Ok(())
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Registry/ledger disagreement can only come from documents written
    /// outside this process. It is reported, not repaired.
    fn warn_on_mismatch(&self) {
        for id in self.groups.ids().filter(|id| !self.ledger.has_partition(id)) {
            warn!(group_id = %id, "Registered group has no ledger partition");
        }
        for id in self.ledger.group_ids().filter(|id| !self.groups.contains(id)) {
            warn!(group_id = %id, "Ledger partition belongs to no registered group");
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn ledger(&self) -> &MessageLedger {
        &self.ledger
    }

    pub fn admins(&self) -> &AdminRegistry {
        &self.admins
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn pending_journal_entries(&self) -> usize {
        self.pending
    }
}
