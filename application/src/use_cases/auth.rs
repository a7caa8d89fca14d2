//! Credential store use case.
//!
//! Signup, login and logout against the persisted user list. All operations
//! are synchronous and never touch the network.

use crate::config::StorageKeys;
use crate::ports::key_value_store::KeyValueStore;
use crate::ports::password_hasher::PasswordHasher;
use mindmingle_domain::{DomainError, User};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Manages registered users and the currently logged-in user.
pub struct AuthManager {
    store: Arc<dyn KeyValueStore>,
    hasher: Arc<dyn PasswordHasher>,
    keys: StorageKeys,
}

impl AuthManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        hasher: Arc<dyn PasswordHasher>,
        keys: StorageKeys,
    ) -> Self {
        Self {
            store,
            hasher,
            keys,
        }
    }

    /// Register a new user and log them in.
    ///
    /// Once the user list is written the account exists. Failing to persist
    /// the login afterwards only costs the restore on the next start.
    pub fn signup(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::missing_credentials());
        }

        let mut users = self.load_users();
        if users.iter().any(|u| u.username == username) {
            debug!("Signup rejected: '{}' already exists", username);
            return Err(DomainError::DuplicateUser);
        }

        let hash = self
            .hasher
            .hash(password)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let user = User::new(username, hash);
        users.push(user.clone());

        self.write_json(&self.keys.users(), &users)?;
        if let Err(e) = self.write_json(&self.keys.current_user(), &user) {
            warn!("Failed to persist login for '{}': {}", user.username, e);
        }

        info!("Registered user '{}'", user.username);
        Ok(user)
    }

    /// Log in an existing user.
    pub fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let username = username.trim();
        let user = self
            .load_users()
            .into_iter()
            .find(|u| u.username == username)
            .ok_or(DomainError::InvalidCredentials)?;

        let verified = match self.hasher.verify(password, &user.password_hash) {
            Ok(verified) => verified,
            Err(e) => {
                warn!("Stored hash for '{}' could not be checked: {}", username, e);
                false
            }
        };
        if !verified {
            debug!("Login rejected for '{}'", username);
            return Err(DomainError::InvalidCredentials);
        }

        self.write_json(&self.keys.current_user(), &user)?;
        info!("User '{}' logged in", user.username);
        Ok(user)
    }

    /// Clear the current user. Storage failures are logged, never returned.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(&self.keys.current_user()) {
            warn!("Failed to clear current user: {}", e);
        }
        info!("Logged out");
    }

    /// The user persisted as logged in by a previous run, if any.
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.store.get(&self.keys.current_user()) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read current user: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring malformed current user record: {}", e);
                None
            }
        }
    }

    fn load_users(&self) -> Vec<User> {
        let raw = match self.store.get(&self.keys.users()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read user list: {}", e);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed user list: {}", e);
            Vec::new()
        })
    }

    fn write_json<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), DomainError> {
        let json =
            serde_json::to_string(value).map_err(|e| DomainError::Storage(e.to_string()))?;
        self.store.set(key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::key_value_store::{MemoryKeyValueStore, StoreError};
    use crate::ports::password_hasher::HashError;

    /// Reversible stand-in so tests stay fast; never used outside tests.
    struct TestHasher;

    impl PasswordHasher for TestHasher {
        fn hash(&self, password: &str) -> Result<String, HashError> {
            Ok(format!("test${}", password.chars().rev().collect::<String>()))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError> {
            let stored = hash
                .strip_prefix("test$")
                .ok_or_else(|| HashError::MalformedHash(hash.to_string()))?;
            Ok(stored.chars().rev().collect::<String>() == password)
        }
    }

    /// Memory store that refuses writes to one key.
    struct RefusingStore {
        inner: MemoryKeyValueStore,
        refused: String,
    }

    impl KeyValueStore for RefusingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == self.refused {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn manager() -> (AuthManager, Arc<MemoryKeyValueStore>) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let auth = AuthManager::new(store.clone(), Arc::new(TestHasher), StorageKeys::default());
        (auth, store)
    }

    #[test]
    fn test_signup_then_login_round_trip() {
        let (auth, _) = manager();
        let created = auth.signup("alice", "s3cret").unwrap();
        auth.logout();

        let logged_in = auth.login("alice", "s3cret").unwrap();
        assert_eq!(created, logged_in);
        assert_eq!(auth.current_user(), Some(logged_in));
    }

    #[test]
    fn test_signup_stores_hash_not_password() {
        let (auth, store) = manager();
        let user = auth.signup("alice", "s3cret").unwrap();
        assert_ne!(user.password_hash, "s3cret");

        let raw = store.get("mindmingle-users").unwrap().unwrap();
        assert!(!raw.contains("\"s3cret\""));
        assert!(raw.contains("passwordHash"));
    }

    #[test]
    fn test_signup_logs_user_in() {
        let (auth, _) = manager();
        auth.signup("alice", "pw").unwrap();
        assert_eq!(auth.current_user().unwrap().username, "alice");
    }

    #[test]
    fn test_signup_succeeds_when_login_cannot_be_persisted() {
        let keys = StorageKeys::default();
        let store = Arc::new(RefusingStore {
            inner: MemoryKeyValueStore::new(),
            refused: keys.current_user(),
        });
        let auth = AuthManager::new(store.clone(), Arc::new(TestHasher), keys);

        let user = auth.signup("alice", "pw").unwrap();
        assert_eq!(user.username, "alice");
        assert!(auth.current_user().is_none());

        assert_eq!(
            auth.signup("alice", "pw").unwrap_err(),
            DomainError::DuplicateUser
        );
        assert!(store.inner.contains("mindmingle-users"));
    }

    #[test]
    fn test_signup_fails_when_user_list_cannot_be_written() {
        let keys = StorageKeys::default();
        let store = Arc::new(RefusingStore {
            inner: MemoryKeyValueStore::new(),
            refused: keys.users(),
        });
        let auth = AuthManager::new(store, Arc::new(TestHasher), keys);

        assert!(matches!(
            auth.signup("alice", "pw").unwrap_err(),
            DomainError::Storage(_)
        ));
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_duplicate_signup_keeps_original_record() {
        let (auth, _) = manager();
        let original = auth.signup("alice", "first").unwrap();

        let err = auth.signup("alice", "second").unwrap_err();
        assert_eq!(err, DomainError::DuplicateUser);

        auth.logout();
        assert_eq!(auth.login("alice", "first").unwrap(), original);
        assert_eq!(
            auth.login("alice", "second").unwrap_err(),
            DomainError::InvalidCredentials
        );
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        let (auth, store) = manager();
        assert!(matches!(
            auth.signup("", "pw").unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            auth.signup("   ", "pw").unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            auth.signup("alice", "").unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(!store.contains("mindmingle-users"));
    }

    #[test]
    fn test_login_unknown_user_fails() {
        let (auth, _) = manager();
        assert_eq!(
            auth.login("ghost", "pw").unwrap_err(),
            DomainError::InvalidCredentials
        );
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_logout_clears_current_user() {
        let (auth, store) = manager();
        auth.signup("alice", "pw").unwrap();
        assert!(store.contains("mindmingle-currentUser"));

        auth.logout();
        assert!(!store.contains("mindmingle-currentUser"));
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn test_malformed_user_list_is_treated_as_empty() {
        let (auth, store) = manager();
        store.set("mindmingle-users", "{not json").unwrap();
        assert_eq!(
            auth.login("alice", "pw").unwrap_err(),
            DomainError::InvalidCredentials
        );
        auth.signup("alice", "pw").unwrap();
    }

    #[test]
    fn test_malformed_stored_hash_rejects_login() {
        let (auth, store) = manager();
        store
            .set(
                "mindmingle-users",
                r#"[{"username":"alice","passwordHash":"plaintext"}]"#,
            )
            .unwrap();
        assert_eq!(
            auth.login("alice", "plaintext").unwrap_err(),
            DomainError::InvalidCredentials
        );
    }
}
