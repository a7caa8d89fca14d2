//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// Google Gemini API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Model used for replies (default: "gemini-2.5-flash").
    pub model: String,
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, prefer the env var).
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: an explicit `api_key` wins over the env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}
