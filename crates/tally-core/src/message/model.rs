//! Message record domain model.

use serde::{Deserialize, Serialize};

use crate::admin::UserId;

/// One observed group message.
///
/// `timestamp` comes from the platform (seconds since the Unix epoch), so
/// records within a partition are in arrival order, not necessarily in
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub user_id: UserId,
    /// Platform username without the leading `@`. Users without a public
    /// username have none.
    pub username: Option<String>,
    pub timestamp: f64,
    #[serde(default)]
    pub text: String,
    /// Journal sequence number assigned when the record was appended.
    /// Records imported from older documents carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

impl MessageRecord {
    pub fn new(
        user_id: UserId,
        username: Option<String>,
        timestamp: f64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            username,
            timestamp,
            text: text.into(),
            seq: None,
        }
    }

    /// Sequence number used for journal replay; legacy records count as 0.
    pub fn seq_or_zero(&self) -> u64 {
        self.seq.unwrap_or(0)
    }

    pub fn is_from(&self, username: &str) -> bool {
        self.username.as_deref() == Some(username)
    }
}
