//! Slash command parsing for the chat REPL

use mindmingle_domain::ChatSession;
use std::path::PathBuf;

/// A parsed REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Quit,
    Logout,
    New,
    List,
    Show,
    Theme,
    Switch(String),
    Delete(String),
    Search(String),
    /// `target` is a list number or session id; `None` means the active session
    Rename {
        target: Option<String>,
        title: String,
    },
    Export(Option<PathBuf>),
    Import(PathBuf),
    /// Known command with missing arguments; holds the usage line
    Usage(&'static str),
    Unknown(String),
}

/// Parse a line starting with `/`.
pub fn parse_command(line: &str) -> ChatCommand {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name {
        "/quit" | "/exit" | "/q" => ChatCommand::Quit,
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/logout" => ChatCommand::Logout,
        "/new" => ChatCommand::New,
        "/list" | "/ls" => ChatCommand::List,
        "/show" => ChatCommand::Show,
        "/theme" => ChatCommand::Theme,
        "/switch" | "/s" => required(rest, "/switch <number|id>", ChatCommand::Switch),
        "/delete" | "/rm" => required(rest, "/delete <number|id>", ChatCommand::Delete),
        "/search" => ChatCommand::Search(rest.to_string()),
        "/rename" => {
            if rest.is_empty() {
                return ChatCommand::Usage("/rename [number|id] <title>");
            }
            match rest.split_once(char::is_whitespace) {
                Some((target, title)) => ChatCommand::Rename {
                    target: Some(target.to_string()),
                    title: title.trim().to_string(),
                },
                None => ChatCommand::Rename {
                    target: None,
                    title: rest.to_string(),
                },
            }
        }
        "/export" => ChatCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "/import" => required(rest, "/import <file>", |path| {
            ChatCommand::Import(PathBuf::from(path))
        }),
        _ => ChatCommand::Unknown(name.to_string()),
    }
}

fn required(
    rest: &str,
    usage: &'static str,
    build: impl FnOnce(String) -> ChatCommand,
) -> ChatCommand {
    if rest.is_empty() {
        ChatCommand::Usage(usage)
    } else {
        build(rest.to_string())
    }
}

/// Resolve a 1-based list number or a session id to a session id.
pub fn resolve_target(sessions: &[ChatSession], target: &str) -> Option<String> {
    if let Ok(number) = target.parse::<usize>()
        && (1..=sessions.len()).contains(&number)
    {
        return Some(sessions[number - 1].id.clone());
    }
    sessions
        .iter()
        .find(|s| s.id == target)
        .map(|s| s.id.clone())
}
