//! Configuration file loading for mindmingle
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MINDMINGLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./mindmingle.toml` or `./.mindmingle.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mindmingle/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig, FileReplConfig,
    FileStorageConfig, STORE_FILE_NAME,
};
pub use loader::ConfigLoader;
