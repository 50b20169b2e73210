//! Storage layer: atomic documents, the journal and the directory lock.

mod dir_lock;
mod document_store;
mod journal_file;

pub use dir_lock::DataDirLock;
pub use document_store::DocumentStore;
pub use journal_file::JournalFile;

use tally_core::TallyError;

/// Errors that can occur in the storage layer.
#[derive(Debug)]
pub enum StorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
    /// Data directory lock error.
    LockError(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(e) => write!(f, "I/O error: {}", e),
            StorageError::JsonError(e) => write!(f, "JSON error: {}", e),
            StorageError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::IoError(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::JsonError(e)
    }
}

impl From<StorageError> for TallyError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::IoError(e) => e.into(),
            StorageError::JsonError(e) => e.into(),
            StorageError::LockError(message) => TallyError::io(message),
        }
    }
}
