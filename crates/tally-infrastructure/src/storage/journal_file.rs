//! Append-only JSON-lines journal.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write as IoWrite};
use std::path::{Path, PathBuf};

use super::StorageError;

/// One JSON value per line, appended and synced one at a time.
///
/// A crash can leave a partially written last line, possibly cut inside a
/// multi-byte character. `read_all` logs and drops it, and the next `append`
/// terminates it first so new entries always start on a fresh line. A
/// malformed line elsewhere is logged and skipped.
pub struct JournalFile {
    path: PathBuf,
}

impl JournalFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry and syncs it to disk.
    pub fn append<T: Serialize>(&self, entry: &T) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut line = Vec::new();
        if ends_unterminated(&mut file)? {
            tracing::warn!(path = %self.path.display(), "Sealing torn journal tail before append");
            line.push(b'\n');
        }
        serde_json::to_writer(&mut line, entry)?;
        line.push(b'\n');

        file.write_all(&line)?;
        file.sync_data()?;
        Ok(())
    }

    /// Reads every complete entry, oldest first. A missing file is empty.
    ///
    /// Lines are parsed as raw bytes, so a bad line never hides the others.
    pub fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read(&self.path)?;
        let terminated = content.last().is_none_or(|b| *b == b'\n');
        let lines: Vec<&[u8]> = content
            .split(|b| *b == b'\n')
            .filter(|line| !line.trim_ascii().is_empty())
            .collect();
        let mut entries = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            match serde_json::from_slice(line) {
                Ok(entry) => entries.push(entry),
                Err(e) if index + 1 == lines.len() && !terminated => {
                    tracing::warn!(
                        path = %self.path.display(),
                        bytes = line.len(),
                        error = %e,
                        "Ignoring torn final journal line"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "Skipping malformed journal line"
                    );
                }
            }
        }
        Ok(entries)
    }

    /// Empties the journal atomically.
    pub fn reset(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "journal".to_string());
        let tmp_path = self.path.with_file_name(format!(".{}.tmp", file_name));

        let tmp_file = File::create(&tmp_path)?;
        tmp_file.sync_all()?;
        drop(tmp_file);
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Whether a non-empty file's last byte is something other than a newline.
fn ends_unterminated(file: &mut File) -> Result<bool, StorageError> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn journal(temp_dir: &TempDir) -> JournalFile {
        JournalFile::new(temp_dir.path().join("test.journal"))
    }

    #[test]
    fn test_append_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        for i in 0..3u32 {
            journal.append(&i).unwrap();
        }
        assert_eq!(journal.read_all::<u32>().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(journal(&temp_dir).read_all::<u32>().unwrap().is_empty());
    }

    #[test]
    fn test_torn_last_line_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        fs::write(journal.path(), "{\"a\":1}\n{\"a\":2}\n{\"a\":").unwrap();

        let entries: Vec<serde_json::Value> = journal.read_all().unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_torn_multibyte_tail_keeps_earlier_lines() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        journal.append(&"مرحبا").unwrap();
        journal.append(&"أهلا").unwrap();

        // "م" is 0xd9 0x85; the write stopped after its first byte.
        let mut torn = fs::read(journal.path()).unwrap();
        torn.extend_from_slice(b"\"\xd9");
        fs::write(journal.path(), torn).unwrap();

        assert_eq!(
            journal.read_all::<String>().unwrap(),
            vec!["مرحبا".to_string(), "أهلا".to_string()]
        );
    }

    #[test]
    fn test_append_after_torn_tail_starts_new_line() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        fs::write(journal.path(), "{\"a\":").unwrap();

        journal.append(&7u32).unwrap();
        journal.append(&8u32).unwrap();
        assert_eq!(journal.read_all::<u32>().unwrap(), vec![7, 8]);
        assert_eq!(fs::read_to_string(journal.path()).unwrap(), "{\"a\":\n7\n8\n");
    }

    #[test]
    fn test_malformed_middle_line_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        fs::write(journal.path(), "1\nnope\n3\n").unwrap();
        assert_eq!(journal.read_all::<u32>().unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_reset() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        journal.append(&1u32).unwrap();
        journal.reset().unwrap();
        assert!(journal.read_all::<u32>().unwrap().is_empty());

        journal.append(&2u32).unwrap();
        assert_eq!(journal.read_all::<u32>().unwrap(), vec![2]);
    }
}
