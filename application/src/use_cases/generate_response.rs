//! Response generator use case.
//!
//! Turns a session history plus a new prompt into an assistant reply. The
//! provider may fail or return nothing; either way the caller receives text
//! it can store in place of the typing placeholder.

use crate::ports::conversation_logger::{
    ConversationLogger, Exchange, ExchangeOutcome, NoConversationLogger,
};
use crate::ports::llm_gateway::{ChatTurn, LlmGateway};
use mindmingle_domain::{Message, Sender, truncate};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reply used when the provider call fails
pub const ERROR_FALLBACK: &str = "An error occurred while getting a response from the AI.";

/// Reply used when the provider returns no text
pub const EMPTY_FALLBACK: &str = "I'm sorry, I couldn't generate a response. Please try again.";

/// Map stored messages to provider turns and append the new prompt.
///
/// Placeholders and empty messages are skipped.
pub fn build_turns(history: &[Message], prompt: &str) -> Vec<ChatTurn> {
    history
        .iter()
        .filter(|m| m.is_model_context())
        .map(|m| match m.sender {
            Sender::User => ChatTurn::user(m.content.clone()),
            Sender::Assistant => ChatTurn::model(m.content.clone()),
        })
        .chain(std::iter::once(ChatTurn::user(prompt)))
        .collect()
}

/// Use case for generating an assistant reply.
#[derive(Clone)]
pub struct ResponseGenerator {
    gateway: Arc<dyn LlmGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ResponseGenerator {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// Generate a reply. Never fails: provider errors and empty replies are
    /// replaced by [`ERROR_FALLBACK`] and [`EMPTY_FALLBACK`].
    pub async fn generate(&self, history: &[Message], prompt: &str) -> String {
        let turns = build_turns(history, prompt);
        info!(
            "Requesting reply from {}: {}",
            self.gateway.model_name(),
            truncate(prompt, 80)
        );
        debug!("Sending {} turns", turns.len());

        let (reply, outcome, error) = match self.gateway.generate(&turns).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("Model returned an empty reply");
                (EMPTY_FALLBACK.to_string(), ExchangeOutcome::Empty, None)
            }
            Ok(text) => {
                debug!("Received reply ({} bytes)", text.len());
                (text, ExchangeOutcome::Replied, None)
            }
            Err(e) => {
                warn!("Reply generation failed: {}", e);
                (ERROR_FALLBACK.to_string(), ExchangeOutcome::Failed, Some(e.to_string()))
            }
        };

        self.conversation_logger.record(&Exchange {
            outcome,
            model: self.gateway.model_name().to_string(),
            turns: turns.len(),
            prompt: prompt.to_string(),
            reply: (outcome == ExchangeOutcome::Replied).then(|| reply.clone()),
            error,
        });
        reply
    }
}
