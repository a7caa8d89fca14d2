//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string::truncate`]: character-based truncation with ellipsis

pub mod error;
pub mod string;
