//! Bot command parsing.

use crate::error::{Result, TallyError};
use crate::group::GroupId;
use crate::query::{CountQuery, DateRange};

/// Usage line for the `count` command.
pub const COUNT_USAGE: &str = "Usage: /count group_id username YYYY-MM-DD YYYY-MM-DD";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Authorize,
    ListGroups,
    Count(CountQuery),
}

impl Command {
    /// Parses a command name and its arguments.
    ///
    /// The name may carry a leading `/` and a trailing `@botname` mention.
    /// Unknown names yield `Ok(None)`; a known name with bad arguments is a
    /// `MalformedCommand` error.
    pub fn parse(name: &str, args: &[String]) -> Result<Option<Self>> {
        let name = name.trim_start_matches('/');
        let name = name.split('@').next().unwrap_or(name);

        let command = match name {
            "start" => Self::Start,
            "authorize" => Self::Authorize,
            "listgroups" => Self::ListGroups,
            "count" => Self::Count(parse_count(args)?),
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

fn parse_count(args: &[String]) -> Result<CountQuery> {
    let [group_id, username, start, end] = args else {
        return Err(TallyError::malformed(format!(
            "expected 4 arguments, got {}",
            args.len()
        )));
    };

    Ok(CountQuery {
        group_id: GroupId::parse(group_id)?,
        username: username.trim_start_matches('@').to_string(),
        range: DateRange::parse(start, end)?,
    })
}

/// Splits a typed line such as `/count 100 @alice 2024-01-05 2024-01-06`
/// into a command name and whitespace-separated arguments.
///
/// Returns `None` for lines that are not commands.
pub fn split_command_line(line: &str) -> Option<(String, Vec<String>)> {
    let line = line.trim();
    if !line.starts_with('/') {
        return None;
    }
    let mut parts = line.split_whitespace();
    let name = parts.next()?.trim_start_matches('/').to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, parts.map(str::to_string).collect()))
}
