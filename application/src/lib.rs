//! Application layer for mindmingle
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::StorageKeys;
pub use ports::{
    conversation_logger::{ConversationLogger, Exchange, ExchangeOutcome, NoConversationLogger},
    key_value_store::{KeyValueStore, MemoryKeyValueStore, StoreError},
    llm_gateway::{ChatTurn, GatewayError, LlmGateway, TurnRole},
    password_hasher::{HashError, PasswordHasher},
    progress::{NoProgress, ReplyProgressNotifier},
};
pub use use_cases::auth::AuthManager;
pub use use_cases::generate_response::{EMPTY_FALLBACK, ERROR_FALLBACK, ResponseGenerator};
pub use use_cases::session_manager::{ChatExport, PendingReply, SendError, SessionManager};
pub use use_cases::session_store::SessionStore;
pub use use_cases::theme_settings::ThemeSettings;
