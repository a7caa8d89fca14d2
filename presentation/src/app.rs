//! Top-level application loop: authenticate, chat, repeat on logout.

use crate::auth::AuthScreen;
use crate::chat::{ChatRepl, ReplExit};
use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use mindmingle_application::{
    AuthManager, ResponseGenerator, SessionManager, SessionStore, ThemeSettings,
};
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::Path;
use tracing::{debug, info, warn};

/// Everything the interactive front end needs, wired by the binary
pub struct App {
    auth: AuthManager,
    session_store: SessionStore,
    generator: ResponseGenerator,
    theme: ThemeSettings,
    config: ReplConfig,
}

impl App {
    pub fn new(
        auth: AuthManager,
        session_store: SessionStore,
        generator: ResponseGenerator,
        theme: ThemeSettings,
        config: ReplConfig,
    ) -> Self {
        Self {
            auth,
            session_store,
            generator,
            theme,
            config,
        }
    }

    /// Run until the user quits.
    ///
    /// A user who was logged in when the previous run ended goes straight to
    /// their chats.
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.resolve_history_file();
        if let Some(ref path) = history_path {
            load_history(&mut rl, path);
        }

        let mut restored = self.auth.current_user();
        loop {
            let user = match restored.take() {
                Some(user) => {
                    info!("Restored login for '{}'", user.username);
                    user
                }
                None => {
                    let formatter = ConsoleFormatter::new(self.theme.current());
                    match AuthScreen::new(&self.auth, &formatter).run(&mut rl)? {
                        Some(user) => user,
                        None => break,
                    }
                }
            };

            let sessions = SessionManager::open(self.session_store.clone(), user.username);
            let mut repl = ChatRepl::new(sessions, &self.generator, &self.theme, &self.config);
            match repl.run(&mut rl).await? {
                ReplExit::Quit => break,
                ReplExit::Logout => {
                    self.auth.logout();
                    println!("Logged out.");
                }
            }
        }

        if let Some(ref path) = history_path {
            save_history(&mut rl, path);
        }
        Ok(())
    }
}

/// Create the directory that holds the history file.
fn prepare_history_dir(path: &Path) -> bool {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return true;
    };
    match std::fs::create_dir_all(parent) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Failed to create history directory {}: {}",
                parent.display(),
                e
            );
            false
        }
    }
}

/// Returns whether earlier history was loaded. A missing file is the
/// normal first run.
fn load_history(rl: &mut DefaultEditor, path: &Path) -> bool {
    if !prepare_history_dir(path) {
        return false;
    }
    if !path.exists() {
        debug!("No history at {} yet", path.display());
        return false;
    }
    match rl.load_history(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to load history {}: {}", path.display(), e);
            false
        }
    }
}

fn save_history(rl: &mut DefaultEditor, path: &Path) -> bool {
    match rl.save_history(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save history {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::History;
    use tempfile::TempDir;

    #[test]
    fn test_history_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.txt");

        assert!(prepare_history_dir(&path));
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_history_dir_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        assert!(!prepare_history_dir(&blocker.join("history.txt")));
    }

    #[test]
    fn test_history_round_trip_and_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        let mut rl = DefaultEditor::new().unwrap();

        assert!(!load_history(&mut rl, &path));
        rl.add_history_entry("/list").unwrap();
        assert!(save_history(&mut rl, &path));

        let mut fresh = DefaultEditor::new().unwrap();
        assert!(load_history(&mut fresh, &path));
        assert_eq!(fresh.history().len(), 1);

        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(!save_history(&mut rl, &blocker.join("history.txt")));
        assert!(!load_history(&mut rl, &blocker.join("history.txt")));
    }
}
