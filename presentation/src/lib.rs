//! Presentation layer for mindmingle
//!
//! This crate contains the CLI definition, the login screen, the chat REPL,
//! console formatting and the typing indicator.

pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use app::App;
pub use auth::{AuthMode, AuthScreen, MaskedTerminal, SecretInput};
pub use chat::{ChatCommand, ChatRepl, ReplExit};
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use output::console::{ConsoleFormatter, Palette};
pub use output::reveal::Typewriter;
pub use progress::typing::TypingIndicator;
