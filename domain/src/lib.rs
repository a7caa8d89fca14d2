//! Domain layer for mindmingle
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Users
//!
//! A [`User`] is a locally registered account. Only a salted password hash is
//! ever stored.
//!
//! ## Chat sessions
//!
//! A [`ChatSession`] is one conversation thread with its own title and
//! message history. While a reply is being generated, the session ends with
//! an assistant placeholder message (`is_typing = true`) which is later
//! replaced in place by the final reply.

pub mod auth;
pub mod chat;
pub mod config;
pub mod core;

// Re-export commonly used types
pub use auth::entities::User;
pub use chat::{
    entities::{ChatSession, DEFAULT_TITLE, Message, Sender},
    id::IdGenerator,
    title::derive_title,
};
pub use config::{ConfigIssue, ConfigIssueCode, Severity, Theme};
pub use core::{error::DomainError, string::truncate};
