//! Error types for the Tally ledger.

use thiserror::Error;

/// A shared error type for the entire Tally workspace.
///
/// The first four variants are the user-facing error kinds handled by the
/// command dispatcher. The rest come from the storage and configuration
/// layers and only ever reach logs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TallyError {
    /// Persistence read/write failure.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Bad argument count or format in a command.
    #[error("Malformed command: {0}")]
    MalformedCommand(String),

    /// Query or event addressed to a group that is not registered.
    #[error("Unknown group: {group_id}")]
    UnknownGroup { group_id: String },

    /// Caller is not in the admin registry.
    #[error("User {user_id} is not authorized")]
    Unauthorized { user_id: i64 },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TallyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a MalformedCommand error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedCommand(message.into())
    }

    /// Creates an UnknownGroup error
    pub fn unknown_group(group_id: impl ToString) -> Self {
        Self::UnknownGroup {
            group_id: group_id.to_string(),
        }
    }

    /// Creates an Unauthorized error
    pub fn unauthorized(user_id: i64) -> Self {
        Self::Unauthorized { user_id }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedCommand(_))
    }

    pub fn is_unknown_group(&self) -> bool {
        matches!(self, Self::UnknownGroup { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, TallyError>`.
pub type Result<T> = std::result::Result<T, TallyError>;
