//! Session store: per-user persistence of chat sessions.

use crate::config::StorageKeys;
use crate::ports::key_value_store::KeyValueStore;
use mindmingle_domain::{ChatSession, DomainError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads and writes the full session list of one user at a time.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Load all sessions of `username`.
    ///
    /// A missing key or a value that does not parse yields an empty list.
    pub fn load(&self, username: &str) -> Vec<ChatSession> {
        let key = self.keys.chats(username);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ChatSession>>(&raw) {
            Ok(sessions) => {
                debug!("Loaded {} sessions for '{}'", sessions.len(), username);
                sessions
            }
            Err(e) => {
                warn!("Ignoring malformed session data under {}: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored list; an empty list removes the key.
    pub fn save(&self, username: &str, sessions: &[ChatSession]) -> Result<(), DomainError> {
        let key = self.keys.chats(username);
        if sessions.is_empty() {
            self.store.remove(&key)?;
            return Ok(());
        }

        let json =
            serde_json::to_string(sessions).map_err(|e| DomainError::Storage(e.to_string()))?;
        self.store.set(&key, &json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::key_value_store::MemoryKeyValueStore;
    use mindmingle_domain::Message;

    fn store() -> (SessionStore, Arc<MemoryKeyValueStore>) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        (SessionStore::new(kv.clone(), StorageKeys::default()), kv)
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let (sessions, _) = store();
        assert!(sessions.load("alice").is_empty());
    }

    #[test]
    fn test_malformed_value_loads_empty() {
        let (sessions, kv) = store();
        kv.set("mindmingle-chats-alice", "[{\"id\": 1}").unwrap();
        assert!(sessions.load("alice").is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let (sessions, _) = store();
        let mut chat = ChatSession::new("session-1");
        chat.messages.push(Message::user("msg-1", "hello"));

        sessions.save("alice", std::slice::from_ref(&chat)).unwrap();
        assert_eq!(sessions.load("alice"), vec![chat]);
        assert!(sessions.load("bob").is_empty());
    }

    #[test]
    fn test_save_empty_removes_key() {
        let (sessions, kv) = store();
        sessions
            .save("alice", &[ChatSession::new("session-1")])
            .unwrap();
        assert!(kv.contains("mindmingle-chats-alice"));

        sessions.save("alice", &[]).unwrap();
        assert!(!kv.contains("mindmingle-chats-alice"));
    }
}
