//! Google Gemini provider.

mod gateway;
mod types;

pub use gateway::GeminiGateway;
