//! Chat domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title given to every freshly created session
pub const DEFAULT_TITLE: &str = "New Chat";

/// Author of a message in a chat session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Older exports spell this `"ai"`
    #[serde(alias = "ai")]
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A message in a chat session (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Set only on the assistant placeholder while its reply is pending
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_typing: bool,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::User,
            content: content.into(),
            timestamp: Utc::now(),
            is_typing: false,
        }
    }

    pub fn assistant(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: Sender::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            is_typing: false,
        }
    }

    /// Empty assistant message shown while a reply is being generated
    pub fn typing_placeholder(id: impl Into<String>) -> Self {
        Self {
            is_typing: true,
            ..Self::assistant(id, "")
        }
    }

    /// Whether this message should be sent to the model as conversation context
    pub fn is_model_context(&self) -> bool {
        !self.content.is_empty() && !self.is_typing
    }
}

/// One independent conversation thread (Entity)
///
/// Messages are kept in append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The pending assistant placeholder, if the trailing message is one
    pub fn typing_placeholder(&self) -> Option<&Message> {
        self.messages.last().filter(|m| m.is_typing)
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.typing_placeholder().is_some()
    }

    /// Drop placeholders that can no longer be settled.
    ///
    /// Returns the number of messages removed.
    pub fn discard_typing_placeholders(&mut self) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !m.is_typing);
        before - self.messages.len()
    }

    /// Case-insensitive title match
    pub fn title_matches(&self, term: &str) -> bool {
        self.title.to_lowercase().contains(&term.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_not_model_context() {
        let placeholder = Message::typing_placeholder("msg-2");
        assert!(placeholder.is_typing);
        assert_eq!(placeholder.sender, Sender::Assistant);
        assert!(!placeholder.is_model_context());

        assert!(Message::user("msg-1", "hi").is_model_context());
        assert!(!Message::assistant("msg-3", "").is_model_context());
    }

    #[test]
    fn test_message_json_shape() {
        let msg = Message::user("msg-1", "hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["sender"], "user");
        assert!(value.get("isTyping").is_none());
        assert!(value["timestamp"].is_string());

        let typing = serde_json::to_value(Message::typing_placeholder("msg-2")).unwrap();
        assert_eq!(typing["sender"], "assistant");
        assert_eq!(typing["isTyping"], true);
    }

    #[test]
    fn test_legacy_ai_sender_is_accepted() {
        let json = r#"{"id":"m","sender":"ai","content":"hey","timestamp":"2024-05-01T10:00:00Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sender, Sender::Assistant);
        assert!(!msg.is_typing);
    }

    #[test]
    fn test_session_defaults_created_at_when_missing() {
        let json = r#"{"id":"a","title":"X","messages":[]}"#;
        let session: ChatSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "a");
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_session_uses_camel_case_created_at() {
        let value = serde_json::to_value(ChatSession::new("session-1")).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["title"], DEFAULT_TITLE);
    }

    #[test]
    fn test_discard_typing_placeholders() {
        let mut session = ChatSession::new("session-1");
        session.messages.push(Message::user("msg-1", "hi"));
        session.messages.push(Message::typing_placeholder("msg-2"));
        assert!(session.is_awaiting_response());

        assert_eq!(session.discard_typing_placeholders(), 1);
        assert!(!session.is_awaiting_response());
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_title_matches_ignores_case() {
        let mut session = ChatSession::new("session-1");
        session.title = "Rust Lifetimes".to_string();
        assert!(session.title_matches("lifetimes"));
        assert!(session.title_matches("RUST"));
        assert!(session.title_matches(""));
        assert!(!session.title_matches("python"));
    }
}
