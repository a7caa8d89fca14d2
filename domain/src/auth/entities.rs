//! Authentication entities

use serde::{Deserialize, Serialize};

/// A registered account (Entity)
///
/// Usernames are unique within the persisted user list. Users are created on
/// signup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    /// Salted password hash in PHC string format
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}
