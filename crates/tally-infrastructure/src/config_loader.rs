//! Loads `TallyConfig` from TOML.

use std::fs;
use std::path::Path;

use tally_core::config::TallyConfig;
use tally_core::error::{Result, TallyError};

use crate::paths::TallyPaths;

/// Loads the configuration.
///
/// An explicitly given file must exist. Without one, the default location
/// is tried and a missing file means default settings.
pub fn load_config(explicit: Option<&Path>) -> Result<TallyConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(TallyError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return read_config(path);
    }

    let default_path = TallyPaths::config_file()
        .map_err(|e| TallyError::config(e.to_string()))?;
    if !default_path.exists() {
        tracing::debug!(path = %default_path.display(), "No config file, using defaults");
        return Ok(TallyConfig::default());
    }
    read_config(&default_path)
}

fn read_config(path: &Path) -> Result<TallyConfig> {
    let content = fs::read_to_string(path)?;
    let config: TallyConfig = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::config::UnknownGroupPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[journal]\ncompact_after = 10\n\n[membership]\nunknown_group = \"reject\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.journal.compact_after, 10);
        assert_eq!(config.membership.unknown_group, UnknownGroupPolicy::Reject);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(Some(&temp_dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "journal = [").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, TallyError::Serialization { .. }));
    }
}
