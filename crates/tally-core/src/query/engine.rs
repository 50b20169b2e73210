//! Range-count query.

use super::range::DateRange;
use crate::error::{Result, TallyError};
use crate::group::{GroupId, GroupRegistry};
use crate::message::MessageLedger;

/// A parsed `count` request.
#[derive(Debug, Clone, PartialEq)]
pub struct CountQuery {
    pub group_id: GroupId,
    /// Username without any leading `@`.
    pub username: String,
    pub range: DateRange,
}

/// Counts the messages `query.username` sent in `query.group_id` within
/// the query's date range.
///
/// This is a full scan of the partition; no index is kept. A registered
/// group without matching records yields 0. The end date is inclusive up to
/// its last instant: a message stamped exactly at the following UTC midnight
/// is not counted.
///
/// # Errors
///
/// - `UnknownGroup` if the group is not in the registry
/// - `MalformedCommand` if the end date cannot be extended by one day
pub fn count_messages(
    ledger: &MessageLedger,
    groups: &GroupRegistry,
    query: &CountQuery,
) -> Result<usize> {
    if !groups.contains(&query.group_id) {
        return Err(TallyError::unknown_group(query.group_id));
    }

    let (start, end) = query.range.bounds()?;
    let count = ledger
        .partition(&query.group_id)
        .unwrap_or_default()
        .iter()
        .filter(|record| record.is_from(&query.username))
        .filter(|record| start <= record.timestamp && record.timestamp < end)
        .count();

    tracing::debug!(
        group_id = %query.group_id,
        username = %query.username,
        count,
        "Range count computed"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRecord;

    const JAN_5: f64 = 1_704_412_800.0;
    const JAN_6: f64 = JAN_5 + 86_400.0;
    const JAN_7: f64 = JAN_6 + 86_400.0;

    fn fixture() -> (MessageLedger, GroupRegistry) {
        let group = GroupId::new(100);
        let mut groups = GroupRegistry::new();
        groups.upsert(group, "Team Chat");
        let mut ledger = MessageLedger::new();
        ledger.ensure_partition(group);

        let alice = |ts: f64| MessageRecord::new(42, Some("alice".into()), ts, "hi");
        for ts in [JAN_5 + 10.0, JAN_5 + 3_600.0, JAN_6 - 1.0] {
            ledger.append(group, alice(ts)).unwrap();
        }
        for ts in [JAN_6 + 60.0, JAN_6 + 7_200.0] {
            ledger.append(group, alice(ts)).unwrap();
        }
        ledger
            .append(group, MessageRecord::new(7, Some("bob".into()), JAN_5 + 5.0, "yo"))
            .unwrap();
        ledger
            .append(group, MessageRecord::new(8, None, JAN_5 + 6.0, "anon"))
            .unwrap();
        // Exactly midnight after the 6th: outside a range ending on the 6th.
        ledger.append(group, alice(JAN_7)).unwrap();
        (ledger, groups)
    }

    fn query(username: &str, start: &str, end: &str) -> CountQuery {
        CountQuery {
            group_id: GroupId::new(100),
            username: username.to_string(),
            range: DateRange::parse(start, end).unwrap(),
        }
    }

    #[test]
    fn test_single_day() {
        let (ledger, groups) = fixture();
        let count = count_messages(&ledger, &groups, &query("alice", "2024-01-05", "2024-01-05"));
        assert_eq!(count.unwrap(), 3);
    }

    #[test]
    fn test_two_days() {
        let (ledger, groups) = fixture();
        let count = count_messages(&ledger, &groups, &query("alice", "2024-01-05", "2024-01-06"));
        assert_eq!(count.unwrap(), 5);
    }

    #[test]
    fn test_other_user_and_case() {
        let (ledger, groups) = fixture();
        assert_eq!(
            count_messages(&ledger, &groups, &query("bob", "2024-01-01", "2024-01-31")).unwrap(),
            1
        );
        assert_eq!(
            count_messages(&ledger, &groups, &query("Alice", "2024-01-01", "2024-01-31")).unwrap(),
            0
        );
    }

    #[test]
    fn test_next_midnight_excluded() {
        let (ledger, groups) = fixture();
        // The fixture's JAN_7 record sits exactly on the boundary.
        let through_6th = count_messages(&ledger, &groups, &query("alice", "2024-01-06", "2024-01-06"));
        assert_eq!(through_6th.unwrap(), 2);
        let through_7th = count_messages(&ledger, &groups, &query("alice", "2024-01-06", "2024-01-07"));
        assert_eq!(through_7th.unwrap(), 3);
    }

    #[test]
    fn test_no_matches_is_zero() {
        let (ledger, groups) = fixture();
        let count = count_messages(&ledger, &groups, &query("alice", "2023-12-01", "2023-12-31"));
        assert_eq!(count.unwrap(), 0);
    }

    #[test]
    fn test_unknown_group() {
        let (ledger, groups) = fixture();
        let mut q = query("alice", "2024-01-01", "2024-01-02");
        q.group_id = GroupId::new(999);
        let err = count_messages(&ledger, &groups, &q).unwrap_err();
        assert!(err.is_unknown_group());
    }
}
