//! Port for the conversation transcript.
//!
//! Every prompt sent to the model yields one [`Exchange`], whatever the
//! outcome. Diagnostics stay in `tracing`; this port only sees what was asked
//! and what came back.

use serde::Serialize;

/// How a prompt/reply exchange ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeOutcome {
    Replied,
    Empty,
    Failed,
}

impl ExchangeOutcome {
    /// Record type written to the transcript
    pub fn event_type(self) -> &'static str {
        match self {
            ExchangeOutcome::Replied => "reply_generated",
            ExchangeOutcome::Empty => "reply_empty",
            ExchangeOutcome::Failed => "reply_failed",
        }
    }
}

/// One prompt sent to the model and its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    #[serde(skip)]
    pub outcome: ExchangeOutcome,
    pub model: String,
    /// Number of turns sent, including the prompt
    pub turns: usize,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Sink for [`Exchange`] records.
///
/// `record` cannot fail; implementations drop what they cannot write.
pub trait ConversationLogger: Send + Sync {
    fn record(&self, exchange: &Exchange);
}

/// Discards every exchange.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn record(&self, _exchange: &Exchange) {}
}
