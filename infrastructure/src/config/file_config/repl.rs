//! REPL configuration from TOML (`[repl]` section)

use super::storage::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show the typing indicator while a reply is pending
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
    /// Delay per character of the typewriter reveal; 0 prints replies at once
    pub reveal_delay_ms: u64,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
            reveal_delay_ms: 20,
        }
    }
}

impl FileReplConfig {
    /// History file with `~/` expanded
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.as_deref().map(expand_home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_path_expands_home() {
        let config = FileReplConfig {
            history_file: Some("~/mm/history.txt".to_string()),
            ..Default::default()
        };
        let path = config.history_path().unwrap();
        assert!(path.ends_with("mm/history.txt"));
        if dirs::home_dir().is_some() {
            assert!(!path.starts_with("~"));
        }
    }

    #[test]
    fn test_no_history_file_by_default() {
        assert_eq!(FileReplConfig::default().history_path(), None);
    }
}
