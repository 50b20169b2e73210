//! Exclusive lock on a data directory.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::StorageError;

const LOCK_FILE: &str = ".lock";

/// Held for as long as a process writes to a data directory.
///
/// The lock is released when the guard is dropped (closing the handle
/// releases the advisory lock).
#[derive(Debug)]
pub struct DataDirLock {
    #[allow(dead_code)]
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    /// Creates the directory if needed and takes the lock without waiting.
    pub fn acquire(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;

        let path = dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.try_lock_exclusive().map_err(|e| {
            StorageError::LockError(format!(
                "data directory {} is in use by another process: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
