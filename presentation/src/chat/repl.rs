//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! Input is read one line at a time; while a reply is being generated the
//! prompt is not shown. Ctrl-C during generation abandons the reply.

use crate::chat::command::{ChatCommand, parse_command, resolve_target};
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::output::reveal::Typewriter;
use crate::progress::typing::TypingIndicator;
use mindmingle_application::{
    NoProgress, ReplyProgressNotifier, ResponseGenerator, SendError, SessionManager, ThemeSettings,
};
use mindmingle_domain::{ChatSession, truncate};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::Path;
use tracing::{debug, info, warn};

/// Why the REPL loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplExit {
    Quit,
    Logout,
}

/// Interactive chat REPL for one logged-in user
pub struct ChatRepl<'a> {
    sessions: SessionManager,
    generator: &'a ResponseGenerator,
    theme: &'a ThemeSettings,
    config: &'a ReplConfig,
    formatter: ConsoleFormatter,
}

impl<'a> ChatRepl<'a> {
    pub fn new(
        sessions: SessionManager,
        generator: &'a ResponseGenerator,
        theme: &'a ThemeSettings,
        config: &'a ReplConfig,
    ) -> Self {
        Self {
            sessions,
            generator,
            formatter: ConsoleFormatter::new(theme.current()),
            theme,
            config,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Run the loop until the user quits or logs out.
    pub async fn run(&mut self, rl: &mut DefaultEditor) -> RlResult<ReplExit> {
        self.print_welcome();

        loop {
            match rl.readline(&self.prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(line) {
                        debug!("History entry not added: {}", e);
                    }

                    if line.starts_with('/') {
                        if let Some(exit) = self.handle_command(line) {
                            return Ok(exit);
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    return Ok(ReplExit::Quit);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn prompt(&self) -> String {
        let title = self
            .sessions
            .active_session()
            .map(|s| truncate(&s.title, 24))
            .unwrap_or_else(|| "no chat".to_string());
        format!("{} > ", title)
    }

    fn print_welcome(&self) {
        println!();
        println!(
            "{}",
            self.formatter
                .header(&format!("MindMingle - {}", self.sessions.username()))
        );
        println!(
            "Model: {}  |  {} chats  |  /help for commands",
            self.generator.model_name(),
            self.sessions.sessions().len()
        );
        self.show_active();
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?            - Show this help");
        println!("  /new                     - Start a new chat");
        println!("  /list, /ls               - List your chats");
        println!("  /switch, /s <n|id>       - Switch to a chat");
        println!("  /show                    - Show the current chat");
        println!("  /rename [n|id] <title>   - Rename a chat (default: current)");
        println!("  /delete, /rm <n|id>      - Delete a chat");
        println!("  /search <text>           - Find chats by title");
        println!("  /export [dir]            - Save all chats as JSON");
        println!("  /import <file>           - Replace all chats from a JSON file");
        println!("  /theme                   - Toggle light/dark theme");
        println!("  /logout                  - Log out");
        println!("  /quit, /exit, /q         - Exit");
        println!();
    }

    fn show_active(&self) {
        match self.sessions.active_session() {
            Some(session) => print!("{}", self.formatter.conversation(session)),
            None => print!("{}", self.formatter.welcome()),
        }
    }

    fn numbered<'s>(
        all: &'s [ChatSession],
        selected: impl IntoIterator<Item = &'s ChatSession>,
    ) -> Vec<(usize, &'s ChatSession)> {
        selected
            .into_iter()
            .filter_map(|s| {
                all.iter()
                    .position(|candidate| candidate.id == s.id)
                    .map(|index| (index + 1, s))
            })
            .collect()
    }

    /// Handle a slash command. Returns `Some` when the loop should end.
    fn handle_command(&mut self, line: &str) -> Option<ReplExit> {
        match parse_command(line) {
            ChatCommand::Quit => {
                println!("Bye!");
                return Some(ReplExit::Quit);
            }
            ChatCommand::Logout => return Some(ReplExit::Logout),
            ChatCommand::Help => self.print_help(),
            ChatCommand::New => {
                self.sessions.create_new_session();
                println!("{}", self.formatter.notice("Started a new chat"));
            }
            ChatCommand::List => {
                let all = self.sessions.sessions();
                let entries = Self::numbered(all, all);
                print!(
                    "{}",
                    self.formatter
                        .session_list(&entries, self.sessions.active_session_id())
                );
            }
            ChatCommand::Search(term) => {
                let entries = Self::numbered(self.sessions.sessions(), self.sessions.search(&term));
                print!(
                    "{}",
                    self.formatter
                        .session_list(&entries, self.sessions.active_session_id())
                );
            }
            ChatCommand::Show => self.show_active(),
            ChatCommand::Switch(target) => {
                match resolve_target(self.sessions.sessions(), &target) {
                    Some(id) => {
                        self.sessions.switch_session(&id);
                        self.show_active();
                    }
                    None => self.no_match(&target),
                }
            }
            ChatCommand::Delete(target) => {
                match resolve_target(self.sessions.sessions(), &target) {
                    Some(id) => {
                        self.sessions.delete_session(&id);
                        println!("{}", self.formatter.notice("Chat deleted"));
                    }
                    None => self.no_match(&target),
                }
            }
            ChatCommand::Rename { target, title } => self.rename(target, title),
            ChatCommand::Export(dir) => self.export(dir.as_deref()),
            ChatCommand::Import(path) => self.import(&path),
            ChatCommand::Theme => {
                let theme = self.theme.toggle();
                self.formatter.set_theme(theme);
                println!(
                    "{}",
                    self.formatter.notice(&format!("Switched to {} theme", theme))
                );
            }
            ChatCommand::Usage(usage) => {
                println!("{}", self.formatter.error(&format!("Usage: {}", usage)));
            }
            ChatCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
        }
        None
    }

    fn no_match(&self, target: &str) {
        println!(
            "{}",
            self.formatter
                .error(&format!("No chat matches '{}'. Use /list to see numbers.", target))
        );
    }

    fn rename(&mut self, target: Option<String>, title: String) {
        // A first word that names no chat is part of the title.
        let (id, title) = match target {
            Some(target) => match resolve_target(self.sessions.sessions(), &target) {
                Some(id) => (Some(id), title),
                None => (
                    self.sessions.active_session_id().map(str::to_string),
                    format!("{} {}", target, title),
                ),
            },
            None => (self.sessions.active_session_id().map(str::to_string), title),
        };

        let title = title.trim();
        if title.is_empty() {
            println!("{}", self.formatter.notice("Title unchanged"));
            return;
        }
        match id {
            Some(id) => {
                self.sessions.rename_session(&id, title);
                println!(
                    "{}",
                    self.formatter.notice(&format!("Renamed chat to '{}'", title))
                );
            }
            None => println!("{}", self.formatter.error("No active chat to rename")),
        }
    }

    fn export(&self, dir: Option<&Path>) {
        let export = match self.sessions.export_chats() {
            Ok(export) => export,
            Err(e) => {
                println!("{}", self.formatter.error(&e.to_string()));
                return;
            }
        };

        let path = dir.unwrap_or(self.config.export_dir.as_path()).join(&export.file_name);
        match std::fs::write(&path, export.contents) {
            Ok(()) => println!(
                "{}",
                self.formatter.notice(&format!(
                    "Exported {} chats to {}",
                    self.sessions.sessions().len(),
                    path.display()
                ))
            ),
            Err(e) => {
                warn!("Failed to write export {}: {}", path.display(), e);
                println!(
                    "{}",
                    self.formatter
                        .error(&format!("Could not write {}: {}", path.display(), e))
                );
            }
        }
    }

    fn import(&mut self, path: &Path) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read import {}: {}", path.display(), e);
                println!(
                    "{}",
                    self.formatter
                        .error("Error importing chats. Please check the file.")
                );
                return;
            }
        };

        match self.sessions.import_chats(&contents) {
            Ok(count) => {
                println!(
                    "{}",
                    self.formatter.notice(&format!("Imported {} chats", count))
                );
                self.show_active();
            }
            Err(e) => println!("{}", self.formatter.error(&e.to_string())),
        }
    }

    async fn process_message(&mut self, line: &str) {
        match self.reply_to(line, interrupted()).await {
            Ok(Some(reply)) => {
                println!();
                if let Some(message) = self
                    .sessions
                    .active_session()
                    .and_then(|s| s.messages.last())
                {
                    println!("{}", self.formatter.message_label(message));
                }
                let typewriter = Typewriter::new(self.config.reveal_delay);
                if let Err(e) = typewriter.reveal(&mut std::io::stdout(), &reply).await {
                    warn!("Failed to print reply: {}", e);
                }
                println!();
            }
            Ok(None) => println!("{}", self.formatter.notice("Reply cancelled.")),
            Err(SendError::NoActiveSession) => println!(
                "{}",
                self.formatter
                    .notice("No active chat. Start one with /new or pick one with /switch.")
            ),
            Err(e) => println!("{}", self.formatter.error(&e.to_string())),
        }
    }

    /// Send `line` and store the reply, unless `cancel` completes first.
    ///
    /// `None` means the reply was abandoned; the user's message is kept.
    async fn reply_to(
        &mut self,
        line: &str,
        cancel: impl Future<Output = ()>,
    ) -> Result<Option<String>, SendError> {
        let pending = self.sessions.send_message(line)?;
        let title = self
            .sessions
            .active_session()
            .map(|s| s.title.clone())
            .unwrap_or_default();

        let indicator;
        let progress: &dyn ReplyProgressNotifier = if self.config.show_progress {
            indicator = TypingIndicator::new();
            &indicator
        } else {
            &NoProgress
        };

        progress.on_reply_start(&title);
        let reply = tokio::select! {
            biased;
            () = cancel => None,
            reply = self.generator.generate(&pending.history, &pending.prompt) => Some(reply),
        };
        progress.on_reply_complete();

        match reply {
            Some(reply) => {
                self.sessions.settle(&pending, reply.clone());
                Ok(Some(reply))
            }
            None => {
                info!("Reply {} cancelled", pending.message_id);
                self.sessions.abandon(&pending);
                Ok(None)
            }
        }
    }
}

/// Completes on Ctrl-C, or never if the signal cannot be watched.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot watch for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mindmingle_application::{
        ChatTurn, GatewayError, KeyValueStore, LlmGateway, MemoryKeyValueStore, SessionStore,
        StorageKeys,
    };
    use mindmingle_domain::{Sender, Theme};
    use std::sync::Arc;
    use std::time::Duration;

    struct EchoGateway;

    #[async_trait]
    impl LlmGateway for EchoGateway {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
            Ok(format!(
                "echo: {}",
                turns.last().map(|t| t.text.as_str()).unwrap_or_default()
            ))
        }
    }

    struct StalledGateway;

    #[async_trait]
    impl LlmGateway for StalledGateway {
        fn model_name(&self) -> &str {
            "stalled"
        }

        async fn generate(&self, _turns: &[ChatTurn]) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    struct Fixture {
        kv: Arc<MemoryKeyValueStore>,
        generator: ResponseGenerator,
        theme: ThemeSettings,
        config: ReplConfig,
    }

    impl Fixture {
        fn new() -> Self {
            colored::control::set_override(false);
            let kv = Arc::new(MemoryKeyValueStore::new());
            let store: Arc<dyn KeyValueStore> = kv.clone();
            Self {
                theme: ThemeSettings::new(store, StorageKeys::default()),
                generator: ResponseGenerator::new(Arc::new(EchoGateway)),
                config: ReplConfig {
                    export_dir: std::env::temp_dir(),
                    ..ReplConfig::default().quiet()
                },
                kv,
            }
        }

        fn repl(&self) -> ChatRepl<'_> {
            let store = SessionStore::new(self.kv.clone(), StorageKeys::default());
            let sessions = SessionManager::open(store, "alice");
            ChatRepl::new(sessions, &self.generator, &self.theme, &self.config)
        }
    }

    #[test]
    fn test_quit_and_logout_end_the_loop() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        assert_eq!(repl.handle_command("/quit"), Some(ReplExit::Quit));
        assert_eq!(repl.handle_command("/logout"), Some(ReplExit::Logout));
        assert_eq!(repl.handle_command("/help"), None);
        assert_eq!(repl.handle_command("/bogus"), None);
    }

    #[test]
    fn test_new_switch_and_delete() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        let first = repl.sessions().active_session_id().unwrap().to_string();

        repl.handle_command("/new");
        assert_eq!(repl.sessions().sessions().len(), 2);
        assert_ne!(repl.sessions().active_session_id(), Some(first.as_str()));

        repl.handle_command("/switch 2");
        assert_eq!(repl.sessions().active_session_id(), Some(first.as_str()));

        repl.handle_command(&format!("/delete {}", first));
        assert_eq!(repl.sessions().sessions().len(), 1);
        assert!(repl.sessions().active_session().is_some());
    }

    #[test]
    fn test_switch_to_unknown_target_keeps_active() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        let active = repl.sessions().active_session_id().map(str::to_string);

        repl.handle_command("/switch 9");
        assert_eq!(repl.sessions().active_session_id().map(str::to_string), active);
    }

    #[test]
    fn test_rename_forms() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();

        repl.handle_command("/rename Weekend plans");
        assert_eq!(repl.sessions().active_session().unwrap().title, "Weekend plans");

        repl.handle_command("/new");
        repl.handle_command("/rename 2 Trip");
        assert_eq!(repl.sessions().sessions()[1].title, "Trip");
    }

    #[test]
    fn test_theme_command_persists_toggle() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        assert_eq!(fixture.theme.current(), Theme::Dark);

        repl.handle_command("/theme");
        assert_eq!(fixture.theme.current(), Theme::Light);
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let fixture = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let mut repl = fixture.repl();
        repl.handle_command("/rename Keep me");

        repl.handle_command(&format!("/export {}", dir.path().display()));
        let file = dir.path().join(StorageKeys::default().export_file_name("alice"));
        assert!(file.exists());

        repl.handle_command("/new");
        repl.handle_command("/new");
        assert_eq!(repl.sessions().sessions().len(), 3);

        repl.handle_command(&format!("/import {}", file.display()));
        assert_eq!(repl.sessions().sessions().len(), 1);
        assert_eq!(repl.sessions().sessions()[0].title, "Keep me");
    }

    #[test]
    fn test_import_of_missing_file_changes_nothing() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        repl.handle_command("/new");

        repl.handle_command("/import /definitely/not/here.json");
        assert_eq!(repl.sessions().sessions().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_line_gets_a_reply() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();
        assert_eq!(fixture.config.reveal_delay, Duration::ZERO);

        repl.process_message("Hello there").await;

        let session = repl.sessions().active_session().unwrap();
        assert_eq!(session.title, "Hello there");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].sender, Sender::Assistant);
        assert_eq!(session.messages[1].content, "echo: Hello there");
        assert!(!repl.sessions().is_awaiting_response());
    }

    #[tokio::test]
    async fn test_cancelled_reply_is_abandoned() {
        let mut fixture = Fixture::new();
        fixture.generator = ResponseGenerator::new(Arc::new(StalledGateway));
        let mut repl = fixture.repl();

        let outcome = repl.reply_to("Hello there", std::future::ready(())).await;
        assert_eq!(outcome, Ok(None));

        let session = repl.sessions().active_session().unwrap();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].sender, Sender::User);
        assert!(!repl.sessions().is_awaiting_response());

        repl.handle_command("/new");
        assert_eq!(repl.sessions().sessions().len(), 2);
    }

    #[tokio::test]
    async fn test_reply_wins_when_not_cancelled() {
        let fixture = Fixture::new();
        let mut repl = fixture.repl();

        let outcome = repl
            .reply_to("ping", std::future::pending::<()>())
            .await
            .unwrap();
        assert_eq!(outcome.as_deref(), Some("echo: ping"));
        assert!(!repl.sessions().is_awaiting_response());
    }
}
