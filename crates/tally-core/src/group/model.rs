//! Group identifier.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, TallyError};

/// Identifier of a chat group.
///
/// Platform group ids are 64-bit integers (often negative). On disk and on
/// the wire they are rendered as decimal strings so they can be used as JSON
/// object keys. Parsing normalizes the text, so `"0100"` and `"100"` address
/// the same group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(i64);

impl GroupId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Parses a user- or file-supplied group id.
    pub fn parse(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| TallyError::malformed(format!("invalid group id '{}': {}", raw, e)))
    }
}

impl From<i64> for GroupId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for GroupId {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GroupIdVisitor;

        impl Visitor<'_> for GroupIdVisitor {
            type Value = GroupId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a group id as a decimal string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<GroupId, E> {
                GroupId::parse(v).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<GroupId, E> {
                Ok(GroupId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<GroupId, E> {
                i64::try_from(v)
                    .map(GroupId)
                    .map_err(|_| E::custom(format!("group id {} out of range", v)))
            }
        }

        deserializer.deserialize_any(GroupIdVisitor)
    }
}
