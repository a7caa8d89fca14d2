//! Password hashing port

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Hashing failed: {0}")]
    Hashing(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
}

/// One-way, salted password hashing.
///
/// Verification must go through [`PasswordHasher::verify`]; hashes are never
/// compared as plain strings.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Check `password` against a hash previously produced by [`hash`](Self::hash).
    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
