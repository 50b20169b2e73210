use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tally_core::{Tracker, TrackerOptions};
use tally_core::command::{Chat, ChatKind, Dispatcher, InboundEvent, Sender, split_command_line};
use tally_infrastructure::FileLedgerRepository;

use super::open_tracker;

const COMMANDS: [&str; 5] = ["/start", "/authorize", "/listgroups", "/count", "/quit"];

/// Completes command names, and group ids in the first `/count` argument.
struct ConsoleHelper {
    group_ids: Vec<String>,
}

impl ConsoleHelper {
    fn new(tracker: &Tracker<FileLedgerRepository>) -> Self {
        let mut helper = Self {
            group_ids: Vec::new(),
        };
        helper.refresh(tracker);
        helper
    }

    fn refresh(&mut self, tracker: &Tracker<FileLedgerRepository>) {
        self.group_ids = tracker
            .list_groups()
            .iter()
            .map(|(id, _)| id.to_string())
            .collect();
    }

    /// Start of the word under the cursor and the candidates it could become.
    fn candidates(&self, line: &str) -> (usize, Vec<&str>) {
        let start = line.rfind(' ').map_or(0, |i| i + 1);
        let word = &line[start..];
        let preceding: Vec<&str> = line[..start].split_whitespace().collect();

        let pool: Vec<&str> = match preceding.as_slice() {
            [] if word.starts_with('/') => COMMANDS.to_vec(),
            ["/count"] => self.group_ids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.starts_with(word))
            .collect();
        (start, matches)
    }
}

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((name, rest)) => Owned(format!("{} {}", name.bright_cyan(), rest)),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let (start, matches) = self.candidates(line);
        let typed = line.len() - start;
        matches
            .into_iter()
            .find(|candidate| candidate.len() > typed)
            .map(|candidate| candidate[typed..].to_string())
    }
}

impl Validator for ConsoleHelper {}

/// Interactive private chat with the bot as `user`.
///
/// Each line is sent as a command event from a private chat whose id is the
/// user's id, the same shape a messaging client would produce.
pub fn execute(
    data_dir: &Path,
    options: TrackerOptions,
    user: i64,
    username: Option<String>,
) -> Result<()> {
    let mut dispatcher = Dispatcher::new(open_tracker(data_dir, options)?);
    let chat = Chat {
        id: user,
        kind: ChatKind::Private,
        title: None,
    };
    let from = Sender { id: user, username };

    let mut editor: Editor<ConsoleHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ConsoleHelper::new(dispatcher.tracker())));

    println!(
        "{}",
        format!("Private chat as user {}. Type /start for help, /quit to leave.", user)
            .bright_yellow()
    );

    loop {
        match editor.readline("tally> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;

                if line == "/quit" || line == "/exit" {
                    break;
                }

                let Some((name, args)) = split_command_line(line) else {
                    println!("{}", "Commands start with '/'. Try /start.".yellow());
                    continue;
                };

                let event = InboundEvent::Command {
                    chat: chat.clone(),
                    from: from.clone(),
                    name,
                    args,
                };
                match dispatcher.handle(event) {
                    Some(reply) => println!("{}", reply.text.bright_green()),
                    None => println!("{}", "(no reply)".dimmed()),
                }
                if let Some(helper) = editor.helper_mut() {
                    helper.refresh(dispatcher.tracker());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    dispatcher.tracker_mut().compact()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::group::GroupId;
    use tempfile::TempDir;

    fn helper_with_groups(temp_dir: &TempDir, ids: &[i64]) -> ConsoleHelper {
        let mut tracker = open_tracker(temp_dir.path(), TrackerOptions::default()).unwrap();
        for id in ids {
            tracker.on_join(GroupId::new(*id), "Team Chat").unwrap();
        }
        ConsoleHelper::new(&tracker)
    }

    #[test]
    fn test_command_names_complete_at_line_start() {
        let temp_dir = TempDir::new().unwrap();
        let helper = helper_with_groups(&temp_dir, &[]);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        assert_eq!(helper.hint("/li", 3, &ctx), Some("stgroups".to_string()));
        let (start, candidates) = helper.complete("/", 1, &ctx).unwrap();
        assert_eq!(start, 0);
        assert_eq!(candidates.len(), COMMANDS.len());
        assert_eq!(helper.hint("hello", 5, &ctx), None);
    }

    #[test]
    fn test_count_completes_registered_group_ids() {
        let temp_dir = TempDir::new().unwrap();
        let helper = helper_with_groups(&temp_dir, &[100, -1001, 250]);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, candidates) = helper.complete("/count 1", 8, &ctx).unwrap();
        assert_eq!(start, 7);
        let ids: Vec<String> = candidates.into_iter().map(|p| p.replacement).collect();
        assert_eq!(ids, vec!["100".to_string()]);

        assert_eq!(helper.hint("/count -10", 10, &ctx), Some("01".to_string()));
        // Only the first argument is a group id.
        assert_eq!(helper.hint("/count 100 ", 11, &ctx), None);
    }
}
