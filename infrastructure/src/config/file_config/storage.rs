//! Storage configuration from TOML (`[storage]` section)

use mindmingle_application::config::storage_keys::DEFAULT_APP_NAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the file holding all persisted keys
pub const STORE_FILE_NAME: &str = "local_storage.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for persisted state (default: `<data_dir>/mindmingle`)
    pub dir: Option<String>,
    /// Prefix for every persisted key
    pub app_name: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl FileStorageConfig {
    /// Directory the store file lives in, if one can be determined.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        match &self.dir {
            Some(dir) => Some(expand_home(dir)),
            None => dirs::data_dir().map(|d| d.join("mindmingle")),
        }
    }

    /// Full path of the store file.
    pub fn resolve_store_file(&self) -> Option<PathBuf> {
        self.resolve_dir().map(|d| d.join(STORE_FILE_NAME))
    }
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
