//! Idempotent journal replay.
//!
//! Replay runs over documents that may already contain some, all, or none of
//! the journal's effects (a crash can land between any two writes). Joins and
//! leaves are naturally idempotent; appends are skipped when the partition
//! already ends at or past the entry's sequence number.

use super::model::JournalEntry;
use crate::group::GroupRegistry;
use crate::message::MessageLedger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: usize,
    pub skipped: usize,
    /// Highest sequence number seen in the journal.
    pub last_seq: u64,
}

/// Applies one entry. Returns `false` if it was already reflected.
pub fn apply(entry: &JournalEntry, groups: &mut GroupRegistry, ledger: &mut MessageLedger) -> bool {
    match entry {
        JournalEntry::Joined { group, name, .. } => {
            groups.upsert(*group, name.clone());
            ledger.ensure_partition(*group);
            true
        }
        JournalEntry::Left { group, .. } => {
            groups.remove(group);
            ledger.remove_partition(group);
            true
        }
        JournalEntry::Appended {
            seq,
            group,
            name,
            record,
        } => {
            groups.upsert(*group, name.clone());
            ledger.ensure_partition(*group);
            if ledger.last_seq(group) >= *seq {
                return false;
            }
            let mut record = record.clone();
            record.seq = Some(*seq);
            // The partition was ensured above.
            ledger.append(*group, record).is_ok()
        }
    }
}

pub fn replay(
    entries: &[JournalEntry],
    groups: &mut GroupRegistry,
    ledger: &mut MessageLedger,
) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for entry in entries {
        if apply(entry, groups, ledger) {
            stats.applied += 1;
        } else {
            stats.skipped += 1;
        }
        stats.last_seq = stats.last_seq.max(entry.seq());
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupId;
    use crate::message::MessageRecord;

    const G: GroupId = GroupId::new(100);

    fn appended(seq: u64, text: &str) -> JournalEntry {
        JournalEntry::Appended {
            seq,
            group: G,
            name: "Team Chat".into(),
            record: MessageRecord::new(42, Some("alice".into()), seq as f64, text),
        }
    }

    fn journal() -> Vec<JournalEntry> {
        vec![
            JournalEntry::Joined {
                seq: 1,
                group: G,
                name: "Team Chat".into(),
            },
            appended(2, "a"),
            JournalEntry::Left { seq: 3, group: G },
            JournalEntry::Joined {
                seq: 4,
                group: G,
                name: "Team Chat".into(),
            },
            appended(5, "b"),
            appended(6, "c"),
        ]
    }

    fn texts(ledger: &MessageLedger) -> Vec<String> {
        ledger
            .partition(&G)
            .map(|p| p.iter().map(|r| r.text.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_replay_from_empty() {
        let (mut groups, mut ledger) = (GroupRegistry::new(), MessageLedger::new());
        let stats = replay(&journal(), &mut groups, &mut ledger);
        assert_eq!(texts(&ledger), vec!["b", "c"]);
        assert!(groups.contains(&G));
        assert_eq!(stats.last_seq, 6);
        assert_eq!(stats.skipped, 0);
    }

    #[test]
    fn test_replay_over_every_prefix_converges() {
        let entries = journal();
        let (mut expected_groups, mut expected_ledger) = (GroupRegistry::new(), MessageLedger::new());
        replay(&entries, &mut expected_groups, &mut expected_ledger);

        for k in 0..=entries.len() {
            let (mut groups, mut ledger) = (GroupRegistry::new(), MessageLedger::new());
            replay(&entries[..k], &mut groups, &mut ledger);
            replay(&entries, &mut groups, &mut ledger);
            assert_eq!(ledger, expected_ledger, "prefix {}", k);
            assert_eq!(groups, expected_groups, "prefix {}", k);
        }
    }

    #[test]
    fn test_duplicate_append_skipped() {
        let (mut groups, mut ledger) = (GroupRegistry::new(), MessageLedger::new());
        assert!(apply(&appended(2, "a"), &mut groups, &mut ledger));
        assert!(!apply(&appended(2, "a"), &mut groups, &mut ledger));
        assert_eq!(texts(&ledger), vec!["a"]);
    }

    #[test]
    fn test_legacy_records_do_not_block_appends() {
        let (mut groups, mut ledger) = (GroupRegistry::new(), MessageLedger::new());
        groups.upsert(G, "Team Chat");
        ledger.ensure_partition(G);
        ledger
            .append(G, MessageRecord::new(1, Some("old".into()), 0.0, "legacy"))
            .unwrap();
        assert!(apply(&appended(1, "new"), &mut groups, &mut ledger));
        assert_eq!(texts(&ledger), vec!["legacy", "new"]);
    }
}
