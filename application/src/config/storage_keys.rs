//! Persisted key layout.
//!
//! | Key | Value |
//! |-----|-------|
//! | `<app>-users` | JSON array of users |
//! | `<app>-currentUser` | JSON user, absent when logged out |
//! | `<app>-chats-<username>` | JSON array of chat sessions |
//! | `<app>-theme` | `"dark"` or `"light"` |

/// Default application namespace for persisted keys
pub const DEFAULT_APP_NAME: &str = "mindmingle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    app_name: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME)
    }
}

impl StorageKeys {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn users(&self) -> String {
        format!("{}-users", self.app_name)
    }

    pub fn current_user(&self) -> String {
        format!("{}-currentUser", self.app_name)
    }

    pub fn chats(&self, username: &str) -> String {
        format!("{}-chats-{}", self.app_name, username)
    }

    pub fn theme(&self) -> String {
        format!("{}-theme", self.app_name)
    }

    /// File name suggested when exporting a user's chats
    pub fn export_file_name(&self, username: &str) -> String {
        format!("{}.json", self.chats(username))
    }
}
