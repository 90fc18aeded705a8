//! REPL input parsing.

use std::path::PathBuf;

use chatdeck_core::Session;

/// Slash commands offered for completion and listed by `/help`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/new", "start a new conversation"),
    ("/history", "list conversations"),
    ("/switch", "<n|id> open a conversation"),
    ("/delete", "<n|id> delete a conversation"),
    ("/clear", "delete every conversation"),
    ("/export", "[dir] write the history to a JSON file"),
    ("/import", "<file> replace the history with a JSON file"),
    ("/stats", "show history statistics"),
    ("/help", "show this help"),
];

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    New,
    History,
    Switch(String),
    Delete(String),
    Clear,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Stats,
    Help,
    Quit,
    /// A known command used with missing arguments
    Usage(&'static str),
    Unknown(String),
}

/// Parses a line; `None` for blank input.
pub fn parse(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Some(Command::Quit);
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Send(trimmed.to_string()));
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (trimmed, None),
    };

    let command = match (name, arg) {
        ("/new", _) => Command::New,
        ("/history", _) => Command::History,
        ("/switch", Some(target)) => Command::Switch(target.to_string()),
        ("/switch", None) => Command::Usage("/switch <n|id>"),
        ("/delete", Some(target)) => Command::Delete(target.to_string()),
        ("/delete", None) => Command::Usage("/delete <n|id>"),
        ("/clear", _) => Command::Clear,
        ("/export", dir) => Command::Export(dir.map(PathBuf::from)),
        ("/import", Some(file)) => Command::Import(PathBuf::from(file)),
        ("/import", None) => Command::Usage("/import <file>"),
        ("/stats", _) => Command::Stats,
        ("/help", _) => Command::Help,
        (other, _) => Command::Unknown(other.to_string()),
    };
    Some(command)
}

/// Resolves a `/switch` or `/delete` target: a 1-based position in the
/// listed order, or a session id.
pub fn resolve_target<'a>(sessions: &'a [Session], target: &str) -> Option<&'a Session> {
    if let Ok(n) = target.parse::<usize>() {
        if let Some(session) = n.checked_sub(1).and_then(|i| sessions.get(i)) {
            return Some(session);
        }
    }
    sessions.iter().find(|s| s.id == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_ignored() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn test_plain_text_is_sent_trimmed() {
        assert_eq!(
            parse("  hello world  "),
            Some(Command::Send("hello world".to_string()))
        );
    }

    #[test]
    fn test_quit_words() {
        assert_eq!(parse("quit"), Some(Command::Quit));
        assert_eq!(parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse("/switch 2"), Some(Command::Switch("2".to_string())));
        assert_eq!(
            parse("/import  ./backup.json "),
            Some(Command::Import(PathBuf::from("./backup.json")))
        );
        assert_eq!(parse("/export"), Some(Command::Export(None)));
        assert_eq!(
            parse("/export /tmp"),
            Some(Command::Export(Some(PathBuf::from("/tmp"))))
        );
    }

    #[test]
    fn test_missing_arguments_yield_usage() {
        assert_eq!(parse("/delete"), Some(Command::Usage("/delete <n|id>")));
        assert_eq!(parse("/import "), Some(Command::Usage("/import <file>")));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse("/frobnicate"), Some(Command::Unknown("/frobnicate".to_string())));
    }

    #[test]
    fn test_resolve_target_by_position_and_id() {
        let sessions = vec![Session::new(), Session::new()];

        assert_eq!(resolve_target(&sessions, "1"), Some(&sessions[0]));
        assert_eq!(resolve_target(&sessions, "2"), Some(&sessions[1]));
        assert_eq!(resolve_target(&sessions, &sessions[1].id), Some(&sessions[1]));
        assert_eq!(resolve_target(&sessions, "0"), None);
        assert_eq!(resolve_target(&sessions, "3"), None);
        assert_eq!(resolve_target(&sessions, "nope"), None);
    }
}
