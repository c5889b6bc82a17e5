//! Chat-completion HTTP client

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::*;

/// OpenAI-compatible chat-completion client
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatClient {
    /// Create a new client from the LLM configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &LlmConfig, base_url: impl Into<String>) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(client)
    }

    /// Send a chat completion request
    pub async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            url = %url,
            tools = request.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Chat completion API error: {} - {}", status, body);
            return Err(Error::LlmApi(format!("{}: {}", status, body)));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            Error::LlmApi(format!("Failed to parse response: {} - {}", e, body))
        })?;

        info!(
            "Chat completion response: finish_reason={:?}, tool_calls={}, tokens={}",
            parsed.choices.first().and_then(|c| c.finish_reason.as_deref()),
            parsed.tool_calls().len(),
            parsed.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Create a request builder preset with this client's model
    pub fn request_builder(&self) -> ChatRequestBuilder {
        ChatRequestBuilder::new(self.model.clone())
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the endpoint base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
