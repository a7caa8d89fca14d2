//! Logging configuration from TOML (`[logging]` section)

use super::storage::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write diagnostic logs to this file instead of stderr
    pub file: Option<String>,
    /// Append one JSON line per prompt/reply exchange to this file
    pub conversation_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }

    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        self.conversation_log.as_deref().map(expand_home)
    }
}
