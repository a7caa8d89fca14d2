//! Infrastructure layer for mindmingle
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod security;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileLoggingConfig, FileOutputConfig, FileProviderConfig,
    FileReplConfig, FileStorageConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::GeminiGateway;
pub use security::Argon2PasswordHasher;
pub use storage::FileKeyValueStore;
