//! Session controller.
//!
//! Owns the in-memory session list of one logged-in user and is the only
//! component that mutates it. Every mutation is persisted through
//! [`SessionStore`] before the method returns.
//!
//! Each session's trailing message follows a small state machine:
//!
//! ```text
//! Idle --send_message--> AwaitingResponse (placeholder appended)
//! AwaitingResponse --settle--> Idle (placeholder replaced in place)
//! AwaitingResponse --abandon--> Idle (placeholder removed)
//! ```
//!
//! Replies are applied by session and message id, never by writing back a
//! snapshot of the list, so a session deleted while its reply is pending is
//! simply not resurrected.

use crate::ports::progress::ReplyProgressNotifier;
use crate::use_cases::generate_response::ResponseGenerator;
use crate::use_cases::session_store::SessionStore;
use chrono::Utc;
use mindmingle_domain::{ChatSession, DomainError, IdGenerator, Message, derive_title};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Reasons a message is not sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("No active session")]
    NoActiveSession,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Still waiting for the previous reply")]
    AwaitingResponse,
}

/// A reply that has been requested but not yet stored.
///
/// Produced by [`SessionManager::send_message`] and consumed by
/// [`SessionManager::settle`].
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub session_id: String,
    /// Id of the typing placeholder the reply will replace
    pub message_id: String,
    /// Conversation before the new user message
    pub history: Vec<Message>,
    /// The trimmed user message
    pub prompt: String,
}

/// Serialized session list ready to be written to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExport {
    pub file_name: String,
    pub contents: String,
}

/// Controller for one user's chat sessions.
pub struct SessionManager {
    username: String,
    store: SessionStore,
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    ids: IdGenerator,
}

impl SessionManager {
    /// Load the sessions of `username`, activating the most recent one.
    ///
    /// A user without sessions gets a fresh "New Chat". Placeholders left
    /// behind by an interrupted run are dropped since nothing can settle them.
    pub fn open(store: SessionStore, username: impl Into<String>) -> Self {
        let username = username.into();
        let mut sessions = store.load(&username);

        let stale: usize = sessions
            .iter_mut()
            .map(ChatSession::discard_typing_placeholders)
            .sum();

        let mut manager = Self {
            username,
            store,
            active_id: sessions.first().map(|s| s.id.clone()),
            sessions,
            ids: IdGenerator::new(),
        };
        manager.observe_ids();

        if manager.sessions.is_empty() {
            manager.create_new_session();
        } else if stale > 0 {
            debug!("Dropped {} stale typing placeholders", stale);
            manager.persist();
        }

        info!(
            "Opened {} sessions for '{}'",
            manager.sessions.len(),
            manager.username
        );
        manager
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Sessions, most recently created first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active session, or `None` if the active id matches nothing.
    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Whether any session is waiting for a reply
    pub fn is_awaiting_response(&self) -> bool {
        self.sessions.iter().any(ChatSession::is_awaiting_response)
    }

    /// Create an empty session, put it first and make it active.
    pub fn create_new_session(&mut self) -> &ChatSession {
        let session = ChatSession::new(self.ids.next_session_id());
        debug!("Created session {}", session.id);
        self.active_id = Some(session.id.clone());
        self.sessions.insert(0, session);
        self.persist();
        &self.sessions[0]
    }

    /// Make `id` the active session. The id is not validated; an unknown id
    /// leaves no session active.
    pub fn switch_session(&mut self, id: &str) {
        debug!("Switching to session {}", id);
        self.active_id = Some(id.to_string());
    }

    /// Delete a session. The list never ends up empty: deleting the last
    /// session creates a fresh one.
    pub fn delete_session(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            debug!("Delete ignored: no session {}", id);
            return;
        }
        info!("Deleted session {}", id);

        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.sessions.first().map(|s| s.id.clone());
        }

        if self.sessions.is_empty() {
            self.create_new_session();
        } else {
            self.persist();
        }
    }

    /// Set a session's title verbatim. Unknown ids are ignored.
    pub fn rename_session(&mut self, id: &str, title: &str) {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            debug!("Rename ignored: no session {}", id);
            return;
        };
        session.title = title.to_string();
        self.persist();
    }

    /// Sessions whose title contains `term`, ignoring case
    pub fn search(&self, term: &str) -> Vec<&ChatSession> {
        self.sessions
            .iter()
            .filter(|s| s.title_matches(term))
            .collect()
    }

    /// Append the user's message and a typing placeholder to the active
    /// session.
    ///
    /// The first message of a session also sets its title. The returned
    /// [`PendingReply`] must be passed to [`settle`](Self::settle) once the
    /// reply text is known.
    pub fn send_message(&mut self, content: &str) -> Result<PendingReply, SendError> {
        let prompt = content.trim();
        if prompt.is_empty() {
            return Err(SendError::EmptyMessage);
        }
        if self.is_awaiting_response() {
            return Err(SendError::AwaitingResponse);
        }

        let active_id = self.active_id.clone().ok_or(SendError::NoActiveSession)?;
        let user_message_id = self.ids.next_message_id();
        let placeholder_id = self.ids.next_message_id();

        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == active_id)
            .ok_or(SendError::NoActiveSession)?;

        let history = session.messages.clone();
        if history.is_empty() {
            session.title = derive_title(prompt);
        }
        session.messages.push(Message::user(user_message_id, prompt));
        session
            .messages
            .push(Message::typing_placeholder(placeholder_id.clone()));

        debug!(
            "Session {} awaiting reply {} ({} prior messages)",
            active_id,
            placeholder_id,
            history.len()
        );
        self.persist();

        Ok(PendingReply {
            session_id: active_id,
            message_id: placeholder_id,
            history,
            prompt: prompt.to_string(),
        })
    }

    /// Store the reply for a pending placeholder.
    ///
    /// Returns `false` when the session or its placeholder no longer exists,
    /// in which case nothing changes.
    pub fn settle(&mut self, pending: &PendingReply, content: impl Into<String>) -> bool {
        let placeholder = self
            .sessions
            .iter_mut()
            .find(|s| s.id == pending.session_id)
            .and_then(|s| {
                s.messages
                    .iter_mut()
                    .find(|m| m.id == pending.message_id && m.is_typing)
            });

        let Some(message) = placeholder else {
            debug!(
                "Dropping reply {}: session {} is gone",
                pending.message_id, pending.session_id
            );
            return false;
        };

        message.content = content.into();
        message.is_typing = false;
        message.timestamp = Utc::now();
        self.persist();
        true
    }

    /// Drop the placeholder of a reply that will never arrive.
    ///
    /// The user's message stays. Returns `false` when the placeholder is
    /// already gone.
    pub fn abandon(&mut self, pending: &PendingReply) -> bool {
        let Some(session) = self
            .sessions
            .iter_mut()
            .find(|s| s.id == pending.session_id)
        else {
            return false;
        };

        let before = session.messages.len();
        session
            .messages
            .retain(|m| !(m.id == pending.message_id && m.is_typing));
        if session.messages.len() == before {
            return false;
        }

        debug!("Abandoned reply {}", pending.message_id);
        self.persist();
        true
    }

    /// Send a message, wait for the generated reply and store it.
    ///
    /// Returns the stored reply text.
    pub async fn send_and_wait(
        &mut self,
        generator: &ResponseGenerator,
        content: &str,
        progress: &dyn ReplyProgressNotifier,
    ) -> Result<String, SendError> {
        let pending = self.send_message(content)?;
        let title = self
            .active_session()
            .map(|s| s.title.clone())
            .unwrap_or_default();

        progress.on_reply_start(&title);
        let reply = generator.generate(&pending.history, &pending.prompt).await;
        progress.on_reply_complete();

        self.settle(&pending, reply.clone());
        Ok(reply)
    }

    /// Serialize all sessions as pretty-printed JSON.
    pub fn export_chats(&self) -> Result<ChatExport, DomainError> {
        let contents = serde_json::to_string_pretty(&self.sessions)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(ChatExport {
            file_name: self.store.keys().export_file_name(&self.username),
            contents,
        })
    }

    /// Replace all sessions with the contents of an exported file.
    ///
    /// The document must be a JSON array whose elements each have a
    /// non-empty `id`, a non-empty `title` and a `messages` list. On any
    /// error the current sessions are left untouched. Returns the number of
    /// sessions imported.
    pub fn import_chats(&mut self, json: &str) -> Result<usize, DomainError> {
        let document: Value = serde_json::from_str(json).map_err(|e| {
            warn!("Import rejected: {}", e);
            DomainError::unreadable_chat_file()
        })?;

        let well_formed = document
            .as_array()
            .is_some_and(|items| items.iter().all(looks_like_session));
        if !well_formed {
            warn!("Import rejected: not a list of sessions");
            return Err(DomainError::invalid_chat_file());
        }

        let mut sessions: Vec<ChatSession> = serde_json::from_value(document).map_err(|e| {
            warn!("Import rejected: {}", e);
            DomainError::unreadable_chat_file()
        })?;
        for session in &mut sessions {
            session.discard_typing_placeholders();
        }

        let count = sessions.len();
        self.active_id = sessions.first().map(|s| s.id.clone());
        self.sessions = sessions;
        self.observe_ids();
        info!("Imported {} sessions for '{}'", count, self.username);

        if self.sessions.is_empty() {
            self.create_new_session();
        } else {
            self.persist();
        }
        Ok(count)
    }

    fn observe_ids(&mut self) {
        for session in &self.sessions {
            self.ids.observe(&session.id);
            for message in &session.messages {
                self.ids.observe(&message.id);
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.username, &self.sessions) {
            warn!("Failed to save sessions for '{}': {}", self.username, e);
        }
    }
}

fn looks_like_session(item: &Value) -> bool {
    let non_empty_str = |field: &str| {
        item.get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    non_empty_str("id") && non_empty_str("title") && item.get("messages").is_some_and(Value::is_array)
}
