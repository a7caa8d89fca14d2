//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod auth;
pub mod generate_response;
pub mod session_manager;
pub mod session_store;
pub mod theme_settings;
