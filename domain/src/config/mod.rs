//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod theme;
pub mod validation;

pub use theme::Theme;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
