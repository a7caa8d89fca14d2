//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod key_value_store;
pub mod llm_gateway;
pub mod password_hasher;
pub mod progress;
