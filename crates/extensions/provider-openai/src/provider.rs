//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use variantsmith_protocols::error::ProviderError;
use variantsmith_protocols::provider::{
    CompletionRequest, CompletionResponse, LLMProvider, ModelDefinition, ProviderCapabilities,
    ProviderSettings,
};

use crate::api::{ApiRequest, ApiResponse};
use crate::converter::convert_request_messages;
use crate::models::get_models;
use crate::parser::parse_response;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI LLM provider.
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
    models: Vec<ModelDefinition>,
    capabilities: ProviderCapabilities,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
            models: get_models(),
            capabilities: ProviderCapabilities {
                vision: true,
                json_mode: true,
                separate_system: false,
                max_concurrent: Some(100),
            },
        }
    }

    /// Create provider from resolved settings.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        match &settings.base_url {
            Some(url) => Self::with_url(settings.api_key.clone(), url.clone()),
            None => Self::new(settings.api_key.clone()),
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> ApiRequest {
        ApiRequest {
            model: request.model.clone(),
            messages: convert_request_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(
        &self,
        api_request: &ApiRequest,
        timeout_seconds: Option<u64>,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(api_request);
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout_seconds.unwrap_or_default())
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = response.text().await.unwrap_or_default();
            // {"error": {"message": "...", "type": "...", "code": "..."}}
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(String::from))
                .unwrap_or(text);
            return Err(ProviderError::from_api_response(status, message, retry_after));
        }

        Ok(response)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn models(&self) -> &[ModelDefinition] {
        &self.models
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let api_request = self.build_request(&request);
        debug!(model = %api_request.model, messages = api_request.messages.len(), "Sending OpenAI request");
        let response = self.send_request(&api_request, request.timeout_seconds).await?;
        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(parse_response(api_response))
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
