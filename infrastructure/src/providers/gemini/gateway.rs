//! Gemini `generateContent` adapter for the [`LlmGateway`] port.

use super::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use mindmingle_application::{ChatTurn, GatewayError, LlmGateway};
use tracing::{debug, warn};

/// LLM gateway backed by the Google Generative Language REST API.
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiGateway {
    pub fn new(model: impl Into<String>, api_key: Option<String>) -> Self {
        let defaults = FileProviderConfig::default();
        Self {
            client: reqwest::Client::new(),
            base_url: defaults.base_url,
            model: model.into(),
            api_key,
            api_key_env: defaults.api_key_env,
        }
    }

    /// Build from the `[provider]` config section, resolving the API key.
    pub fn from_config(config: &FileProviderConfig) -> Self {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No Gemini API key found; set {} to get replies",
                config.api_key_env
            );
        }
        Self {
            base_url: config.base_url.clone(),
            api_key_env: config.api_key_env.clone(),
            ..Self::new(config.model.clone(), api_key)
        }
    }

    /// Point the gateway at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::MissingApiKey(self.api_key_env.clone()))?;

        let body = GenerateContentRequest::from_turns(turns);
        debug!("POST {} ({} turns)", self.endpoint(), turns.len());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| match e.error.status {
                    Some(code) => format!("{} ({})", e.error.message, code),
                    None => e.error.message,
                })
                .unwrap_or(text);
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                detail
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text())
    }
}
