//! Inbound events, bot commands and the dispatcher that routes them.

pub mod dispatcher;
pub mod event;
pub mod parser;

pub use dispatcher::Dispatcher;
pub use event::{Chat, ChatKind, InboundEvent, Reply, Sender};
pub use parser::{Command, split_command_line};
