//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUser,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{0}")]
    Format(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Error raised when signup or login is attempted with blank fields.
    pub fn missing_credentials() -> Self {
        DomainError::Validation("Username and password are required.".to_string())
    }

    /// Error raised when an imported chat file is not a list of sessions.
    pub fn invalid_chat_file() -> Self {
        DomainError::Format("Invalid chat file format.".to_string())
    }

    /// Error raised when an imported chat file cannot be parsed at all.
    pub fn unreadable_chat_file() -> Self {
        DomainError::Format("Error importing chats. Please check the file.".to_string())
    }

    /// Check if this error should be shown to the user as an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::DuplicateUser | DomainError::InvalidCredentials
        )
    }
}
