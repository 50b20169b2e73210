use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tally_core::TrackerOptions;
use tracing::info;

use super::open_tracker;

/// Folds any pending journal entries into the documents.
pub fn compact(data_dir: &Path, options: TrackerOptions) -> Result<()> {
    let mut tracker = open_tracker(data_dir, options)?;
    tracker.compact()?;

    info!(data_dir = %data_dir.display(), "Compaction complete");
    println!(
        "{} {} groups, {} messages, {} admins",
        "Compacted:".bright_green(),
        tracker.groups().len(),
        tracker.ledger().total_records(),
        tracker.admins().len()
    );
    Ok(())
}

/// Prints the group registry with per-group message counts.
pub fn groups(data_dir: &Path, options: TrackerOptions) -> Result<()> {
    let tracker = open_tracker(data_dir, options)?;
    let groups = tracker.list_groups();

    if groups.is_empty() {
        println!("{}", "No groups registered.".yellow());
        return Ok(());
    }

    println!("{}", format!("{} group(s):", groups.len()).bright_cyan());
    for (group_id, name) in groups {
        let messages = tracker
            .ledger()
            .partition(&group_id)
            .map_or(0, |records| records.len());
        println!(
            "  {:>16}  {}  {}",
            group_id.to_string().bright_white(),
            name,
            format!("({} messages)", messages).dimmed()
        );
    }
    Ok(())
}
