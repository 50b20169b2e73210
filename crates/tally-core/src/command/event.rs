//! Transport-neutral inbound events and outbound replies.
//!
//! The messaging client translates platform updates into these types; the
//! dispatcher never sees platform objects.

use serde::{Deserialize, Serialize};

use crate::admin::UserId;
use crate::group::GroupId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Chat {
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }

    /// Only group and supergroup chats are tracked.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ChatKind::Group | ChatKind::Supergroup)
    }

    pub fn group_id(&self) -> GroupId {
        GroupId::new(self.id)
    }

    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown Group")
    }
}

/// The user who caused an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A plain (non-command) text message.
    Message {
        chat: Chat,
        from: Sender,
        /// Platform timestamp, seconds since the Unix epoch.
        date: f64,
        #[serde(default)]
        text: String,
    },
    /// A bot command, already split into name and arguments.
    Command {
        chat: Chat,
        from: Sender,
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// The bot itself was added to a chat.
    BotAdded { chat: Chat },
    /// The bot itself was removed from a chat.
    BotRemoved { chat: Chat },
}

impl InboundEvent {
    pub fn chat(&self) -> &Chat {
        match self {
            Self::Message { chat, .. }
            | Self::Command { chat, .. }
            | Self::BotAdded { chat }
            | Self::BotRemoved { chat } => chat,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Command { .. } => "command",
            Self::BotAdded { .. } => "bot_added",
            Self::BotRemoved { .. } => "bot_removed",
        }
    }
}

/// A text reply to be delivered to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
}

impl Reply {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}
