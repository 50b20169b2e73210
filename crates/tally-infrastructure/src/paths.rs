//! Path resolution for configuration and data files.

use std::path::{Path, PathBuf};

use tally_core::config::TallyConfig;

const APP_DIR: &str = "tally";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path management for tally.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tally/
/// └── config.toml              # Optional configuration
///
/// ~/.local/share/tally/        # Default data directory
/// ├── message_history.json     # Ledger: group id → [message record]
/// ├── group_names.json         # Group registry: group id → display name
/// ├── admin_users.json         # Admin registry: [user id]
/// ├── ledger.journal           # Mutations since the last compaction
/// └── .lock                    # Held by the running process
/// ```
pub struct TallyPaths;

impl TallyPaths {
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Default location of `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Picks the data directory: explicit override, then the configured
    /// directory, then the platform default.
    pub fn resolve_data_dir(
        explicit: Option<&Path>,
        config: &TallyConfig,
    ) -> Result<PathBuf, PathError> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &config.data_dir {
            return Ok(dir.clone());
        }
        Self::default_data_dir()
    }
}
