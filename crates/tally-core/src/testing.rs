//! In-memory repository used by the core's unit tests.

use std::sync::{Arc, Mutex};

use crate::admin::AdminRegistry;
use crate::error::{Result, TallyError};
use crate::group::GroupRegistry;
use crate::journal::JournalEntry;
use crate::message::MessageLedger;
use crate::repository::{LedgerRepository, Snapshot};

#[derive(Default)]
struct Stored {
    snapshot: Snapshot,
    fail_writes: bool,
}

/// Shared-state mock: clones observe the same storage, so a test can keep a
/// handle while the tracker owns another.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Stored>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    pub fn journal_len(&self) -> usize {
        self.inner.lock().unwrap().snapshot.journal.len()
    }

    pub fn stored_ledger(&self) -> MessageLedger {
        self.inner.lock().unwrap().snapshot.ledger.clone()
    }

    pub fn stored_groups(&self) -> GroupRegistry {
        self.inner.lock().unwrap().snapshot.groups.clone()
    }

    pub fn stored_admins(&self) -> AdminRegistry {
        self.inner.lock().unwrap().snapshot.admins.clone()
    }

    fn write(&self, f: impl FnOnce(&mut Snapshot)) -> Result<()> {
        let mut stored = self.inner.lock().unwrap();
        if stored.fail_writes {
            return Err(TallyError::io("simulated write failure"));
        }
        f(&mut stored.snapshot);
        Ok(())
    }
}

impl LedgerRepository for MemoryRepository {
    fn load_snapshot(&self) -> Snapshot {
        self.inner.lock().unwrap().snapshot.clone()
    }

    fn save_ledger(&self, ledger: &MessageLedger) -> Result<()> {
        self.write(|s| s.ledger = ledger.clone())
    }

    fn save_groups(&self, groups: &GroupRegistry) -> Result<()> {
        self.write(|s| s.groups = groups.clone())
    }

    fn save_admins(&self, admins: &AdminRegistry) -> Result<()> {
        self.write(|s| s.admins = admins.clone())
    }

    fn append_journal(&self, entry: &JournalEntry) -> Result<()> {
        self.write(|s| s.journal.push(entry.clone()))
    }

    fn reset_journal(&self) -> Result<()> {
        self.write(|s| s.journal.clear())
    }
}
