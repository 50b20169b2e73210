//! File-backed LedgerRepository implementation

use std::path::{Path, PathBuf};

use tally_core::admin::AdminRegistry;
use tally_core::error::Result;
use tally_core::group::GroupRegistry;
use tally_core::journal::JournalEntry;
use tally_core::message::MessageLedger;
use tally_core::repository::{LedgerRepository, Snapshot};

use crate::storage::{DataDirLock, DocumentStore, JournalFile};

pub const LEDGER_DOCUMENT: &str = "message_history.json";
pub const GROUPS_DOCUMENT: &str = "group_names.json";
pub const ADMINS_DOCUMENT: &str = "admin_users.json";
pub const JOURNAL_FILE: &str = "ledger.journal";

/// Stores the ledger state as JSON documents in one directory.
///
/// Directory structure:
/// ```text
/// data_dir/
/// ├── message_history.json
/// ├── group_names.json
/// ├── admin_users.json
/// ├── ledger.journal
/// └── .lock
/// ```
///
/// The directory is locked for the lifetime of the repository.
pub struct FileLedgerRepository {
    documents: DocumentStore,
    journal: JournalFile,
    _lock: DataDirLock,
}

impl FileLedgerRepository {
    /// Opens (creating if needed) and locks a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is locked by
    /// another process. Callers treat this as fatal.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let lock = DataDirLock::acquire(data_dir)?;
        tracing::info!(data_dir = %data_dir.display(), "Data directory locked");
        Ok(Self {
            documents: DocumentStore::new(data_dir.to_path_buf()),
            journal: JournalFile::new(data_dir.join(JOURNAL_FILE)),
            _lock: lock,
        })
    }

    pub fn data_dir(&self) -> &Path {
        self.documents.dir()
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.documents.path(name)
    }
}

impl LedgerRepository for FileLedgerRepository {
    fn load_snapshot(&self) -> Snapshot {
        let journal = self.journal.read_all().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error reading journal, ignoring it");
            Vec::new()
        });
        Snapshot {
            ledger: self.documents.load(LEDGER_DOCUMENT, MessageLedger::default()),
            groups: self.documents.load(GROUPS_DOCUMENT, GroupRegistry::default()),
            admins: self.documents.load(ADMINS_DOCUMENT, AdminRegistry::default()),
            journal,
        }
    }

    fn save_ledger(&self, ledger: &MessageLedger) -> Result<()> {
        self.documents.save(LEDGER_DOCUMENT, ledger)?;
        Ok(())
    }

    fn save_groups(&self, groups: &GroupRegistry) -> Result<()> {
        self.documents.save(GROUPS_DOCUMENT, groups)?;
        Ok(())
    }

    fn save_admins(&self, admins: &AdminRegistry) -> Result<()> {
        self.documents.save(ADMINS_DOCUMENT, admins)?;
        Ok(())
    }

    fn append_journal(&self, entry: &JournalEntry) -> Result<()> {
        self.journal.append(entry)?;
        Ok(())
    }

    fn reset_journal(&self) -> Result<()> {
        self.journal.reset()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::group::GroupId;
    use tally_core::message::MessageRecord;
    use tempfile::TempDir;

    #[test]
    fn test_empty_directory_gives_empty_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileLedgerRepository::open(temp_dir.path()).unwrap();
        let snapshot = repo.load_snapshot();
        assert_eq!(snapshot.ledger.partition_count(), 0);
        assert!(snapshot.groups.is_empty());
        assert!(snapshot.admins.is_empty());
        assert!(snapshot.journal.is_empty());
    }

    #[test]
    fn test_documents_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileLedgerRepository::open(temp_dir.path()).unwrap();

        let group = GroupId::new(-100);
        let mut ledger = MessageLedger::new();
        ledger.ensure_partition(group);
        ledger
            .append(group, MessageRecord::new(42, Some("alice".into()), 1.5, "héllo"))
            .unwrap();
        let mut groups = GroupRegistry::new();
        groups.upsert(group, "Team Chat");
        let mut admins = AdminRegistry::new();
        admins.authorize(42);

        repo.save_ledger(&ledger).unwrap();
        repo.save_groups(&groups).unwrap();
        repo.save_admins(&admins).unwrap();

        let snapshot = repo.load_snapshot();
        assert_eq!(snapshot.ledger, ledger);
        assert_eq!(snapshot.groups, groups);
        assert_eq!(snapshot.admins, admins);
    }

    #[test]
    fn test_reads_legacy_documents() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(LEDGER_DOCUMENT),
            r#"{"100": [{"user_id": 42, "username": "alice", "timestamp": 1704412810.0, "text": "hi"}]}"#,
        )
        .unwrap();
        std::fs::write(temp_dir.path().join(GROUPS_DOCUMENT), r#"{"100": "Team Chat"}"#).unwrap();
        std::fs::write(temp_dir.path().join(ADMINS_DOCUMENT), "[42, 7]").unwrap();

        let repo = FileLedgerRepository::open(temp_dir.path()).unwrap();
        let snapshot = repo.load_snapshot();
        assert_eq!(snapshot.ledger.partition(&GroupId::new(100)).unwrap().len(), 1);
        assert_eq!(snapshot.groups.display_name(&GroupId::new(100)), Some("Team Chat"));
        assert!(snapshot.admins.is_authorized(7));
    }

    #[test]
    fn test_journal_round_trip_and_reset() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileLedgerRepository::open(temp_dir.path()).unwrap();
        let entry = JournalEntry::Joined {
            seq: 1,
            group: GroupId::new(100),
            name: "Team Chat".into(),
        };
        repo.append_journal(&entry).unwrap();
        assert_eq!(repo.load_snapshot().journal, vec![entry]);

        repo.reset_journal().unwrap();
        assert!(repo.load_snapshot().journal.is_empty());
    }
}
