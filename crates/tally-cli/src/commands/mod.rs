pub mod console;
pub mod maintenance;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Tracker, TrackerOptions};
use tally_infrastructure::FileLedgerRepository;

/// Opens and locks the data directory. Any failure here is fatal.
pub fn open_tracker(data_dir: &Path, options: TrackerOptions) -> Result<Tracker<FileLedgerRepository>> {
    let repository = FileLedgerRepository::open(data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    Ok(Tracker::open(repository, options))
}
