//! Named JSON documents with atomic replacement.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use super::StorageError;

/// A directory of named JSON documents.
///
/// Provides:
/// - **Atomicity**: each save is a full replacement via tmp file + rename
/// - **Durability**: explicit fsync before rename
///
/// Does NOT:
/// - Know about specific documents (ledger, registries)
/// - Give atomicity across documents
/// - Keep anything in memory between calls
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Loads a document, falling back to `default` if it is missing or
    /// cannot be read. Failures are logged, never returned.
    pub fn load<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.try_load(name) {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!(document = name, "Document not found, using default");
                default
            }
            Err(e) => {
                tracing::error!(document = name, error = %e, "Error loading document, using default");
                default
            }
        }
    }

    /// Loads a document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn try_load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let document: T = serde_json::from_str(&content)?;
        Ok(Some(document))
    }

    /// Replaces a document atomically.
    pub fn save<T: Serialize>(&self, name: &str, document: &T) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let json = serde_json::to_string_pretty(document)?;

        // Write to temporary file in the same directory
        let tmp_path = self.dir.join(format!(".{}.tmp", name));
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, self.path(name))?;

        tracing::debug!(document = name, bytes = json.len(), "Document saved");
        Ok(())
    }
}
