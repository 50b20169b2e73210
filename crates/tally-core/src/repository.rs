//! Persistence port for the ledger state.
//!
//! Defines the contract the tracker needs from storage, decoupling the core
//! from the concrete file layout (see `tally-infrastructure`).

use crate::admin::AdminRegistry;
use crate::error::Result;
use crate::group::GroupRegistry;
use crate::journal::JournalEntry;
use crate::message::MessageLedger;

/// Everything read from storage at startup.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ledger: MessageLedger,
    pub groups: GroupRegistry,
    pub admins: AdminRegistry,
    /// Journal entries written since the last compaction, oldest first.
    pub journal: Vec<JournalEntry>,
}

/// Storage for the three ledger documents and the journal.
///
/// # Implementation Notes
///
/// - Each `save_*` replaces the whole named document.
/// - No atomicity is expected across documents; the journal covers that.
/// - `load_snapshot` never fails: missing or unreadable documents degrade to
///   empty defaults and are logged by the implementation.
pub trait LedgerRepository: Send + Sync {
    fn load_snapshot(&self) -> Snapshot;

    fn save_ledger(&self, ledger: &MessageLedger) -> Result<()>;

    fn save_groups(&self, groups: &GroupRegistry) -> Result<()>;

    fn save_admins(&self, admins: &AdminRegistry) -> Result<()>;

    /// Durably appends one entry to the journal.
    fn append_journal(&self, entry: &JournalEntry) -> Result<()>;

    /// Empties the journal after its effects are in the documents.
    fn reset_journal(&self) -> Result<()>;
}
