//! Presentation-level configuration
//!
//! Settings for REPL behavior, resolved by the binary from the config file
//! and command-line flags.

use std::path::PathBuf;
use std::time::Duration;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Show the typing indicator while a reply is pending
    pub show_progress: bool,
    /// Per-character delay of the typewriter reveal; zero disables it
    pub reveal_delay: Duration,
    /// Path to history file (default: `<data_dir>/mindmingle/history.txt`)
    pub history_file: Option<PathBuf>,
    /// Directory exports are written to when `/export` names none
    pub export_dir: PathBuf,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            reveal_delay: Duration::from_millis(20),
            history_file: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ReplConfig {
    /// Quiet mode: no spinner and replies printed at once.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self.reveal_delay = Duration::ZERO;
        self
    }

    pub fn resolve_history_file(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("mindmingle").join("history.txt"))
        })
    }
}
