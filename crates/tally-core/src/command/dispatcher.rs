//! Routes inbound events to the tracker and renders replies.
//!
//! Every error is handled here: user-facing kinds become reply text,
//! persistence failures are logged and the in-memory change is kept.

use tracing::{debug, error};

use super::event::{Chat, InboundEvent, Reply, Sender};
use super::parser::{COUNT_USAGE, Command};
use crate::error::{Result, TallyError};
use crate::message::MessageRecord;
use crate::query::CountQuery;
use crate::repository::LedgerRepository;
use crate::tracker::Tracker;

const WELCOME: &str = "Welcome to the Message Counter Bot!\n\n\
Available commands:\n\
/authorize - Register yourself as an admin\n\
/listgroups - Show all groups the bot is in\n\
/count <group_id> <username> <start_date> <end_date> - Count messages\n\n\
Date format: YYYY-MM-DD";

const JOINED: &str = "Thanks for adding me! I'll start tracking messages now.";
const GROUP_READY: &str = "Bot is ready to track messages in this group.";
const AUTHORIZED: &str = "You are now authorized to use the bot.";
const NOT_AUTHORIZED: &str = "You need to be authorized to use this command. Use /authorize first.";
const NO_GROUPS: &str = "I am not added to any groups yet. Please add me to a group first.";
const UNKNOWN_GROUP: &str = "Error: Bot is not in this group or group ID is invalid.";
const LIST_GROUPS_HINT: &str = "Use /listgroups to see available group IDs";

pub struct Dispatcher<R: LedgerRepository> {
    tracker: Tracker<R>,
}

impl<R: LedgerRepository> Dispatcher<R> {
    pub fn new(tracker: Tracker<R>) -> Self {
        Self { tracker }
    }

    /// Processes one event. Returns the reply to send, if any.
    pub fn handle(&mut self, event: InboundEvent) -> Option<Reply> {
        debug!(kind = event.kind(), chat_id = event.chat().id, "Handling event");
        match event {
            InboundEvent::Message {
                chat,
                from,
                date,
                text,
            } => {
                self.track_message(&chat, from, date, text);
                None
            }
            InboundEvent::Command {
                chat,
                from,
                name,
                args,
            } => self.handle_command(&chat, &from, &name, &args),
            InboundEvent::BotAdded { chat } => {
                if !chat.is_group() {
                    return None;
                }
                self.join(&chat);
                Some(Reply::new(chat.id, JOINED))
            }
            InboundEvent::BotRemoved { chat } => {
                log_io(self.tracker.on_leave(chat.group_id()));
                None
            }
        }
    }

    fn track_message(&mut self, chat: &Chat, from: Sender, date: f64, text: String) {
        if !chat.is_group() {
            return;
        }
        let record = MessageRecord::new(from.id, from.username, date, text);
        match self
            .tracker
            .record_message(chat.group_id(), chat.display_name(), record)
        {
            Ok(()) => {}
            // Already logged by the tracker.
            Err(TallyError::UnknownGroup { .. }) => {}
            Err(e) => error!(chat_id = chat.id, error = %e, "Failed to persist message"),
        }
    }

    fn join(&mut self, chat: &Chat) {
        log_io(self.tracker.on_join(chat.group_id(), chat.display_name()));
    }

    fn handle_command(
        &mut self,
        chat: &Chat,
        from: &Sender,
        name: &str,
        args: &[String],
    ) -> Option<Reply> {
        // Authorization is checked before argument errors are reported.
        let command = match Command::parse(name, args) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!(name, "Ignoring unknown command");
                return None;
            }
            Err(e) => {
                if let Err(denied) = self.require_admin(chat, from) {
                    return Some(Reply::new(chat.id, error_text(&denied)));
                }
                return Some(Reply::new(chat.id, error_text(&e)));
            }
        };

        let text = match command {
            Command::Start => self.start(chat),
            Command::Authorize => self.authorize(chat, from)?,
            Command::ListGroups => self
                .require_admin(chat, from)
                .map(|()| self.list_groups())
                .unwrap_or_else(|e| error_text(&e)),
            Command::Count(query) => self
                .require_admin(chat, from)
                .and_then(|()| self.count(&query))
                .unwrap_or_else(|e| error_text(&e)),
        };
        Some(Reply::new(chat.id, text))
    }

    fn start(&mut self, chat: &Chat) -> String {
        if chat.is_private() {
            return WELCOME.to_string();
        }
        self.join(chat);
        GROUP_READY.to_string()
    }

    /// Self-enrollment only works in a private chat; elsewhere it is ignored.
    fn authorize(&mut self, chat: &Chat, from: &Sender) -> Option<String> {
        if !chat.is_private() {
            return None;
        }
        log_io(self.tracker.authorize(from.id));
        Some(AUTHORIZED.to_string())
    }

    fn require_admin(&self, chat: &Chat, from: &Sender) -> Result<()> {
        if chat.is_private() && self.tracker.is_authorized(from.id) {
            Ok(())
        } else {
            Err(TallyError::unauthorized(from.id))
        }
    }

    fn list_groups(&self) -> String {
        let groups = self.tracker.list_groups();
        if groups.is_empty() {
            return NO_GROUPS.to_string();
        }
        let listing = groups
            .iter()
            .map(|(id, name)| format!("Group: {}\nID: {}\n", name, id))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Groups I am tracking:\n\n{}\nUse these IDs with the /count command.",
            listing
        )
    }

    fn count(&self, query: &CountQuery) -> Result<String> {
        let count = self.tracker.count(query)?;
        let group_name = self
            .tracker
            .groups()
            .display_name(&query.group_id)
            .unwrap_or("Unknown Group");
        Ok(format!(
            "In group '{}':\nUser @{} sent {} messages between {} and {}",
            group_name, query.username, count, query.range.start, query.range.end
        ))
    }

    pub fn tracker(&self) -> &Tracker<R> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker<R> {
        &mut self.tracker
    }

    pub fn into_tracker(self) -> Tracker<R> {
        self.tracker
    }
}

fn log_io<T>(result: Result<T>) {
    if let Err(e) = result {
        error!(error = %e, "Persistence failed; change kept in memory");
    }
}

fn error_text(err: &TallyError) -> String {
    match err {
        TallyError::Unauthorized { .. } => NOT_AUTHORIZED.to_string(),
        TallyError::UnknownGroup { .. } => UNKNOWN_GROUP.to_string(),
        TallyError::MalformedCommand(detail) => format!(
            "Error: Please check the format of your command ({}).\n{}\n{}",
            detail, COUNT_USAGE, LIST_GROUPS_HINT
        ),
        other => {
            error!(error = %other, "Command failed");
            "Something went wrong. Please try again later.".to_string()
        }
    }
}
