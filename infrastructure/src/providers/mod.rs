//! LLM provider adapters implementing the
//! [`LlmGateway`](mindmingle_application::LlmGateway) port.

pub mod gemini;

pub use gemini::GeminiGateway;
