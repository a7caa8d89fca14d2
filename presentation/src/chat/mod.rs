//! Interactive chat module
//!
//! Readline-based chat loop with slash commands for managing sessions.

pub mod command;
mod repl;

pub use command::{ChatCommand, parse_command};
pub use repl::{ChatRepl, ReplExit};
