//! Provider Gateway.
//!
//! One canonical request in, one normalized reply out. The gateway enforces
//! the request-size ceiling before anything leaves the process, turns empty
//! or filtered completions into their own error class and never retries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use variantsmith_config::GatewayConfig;
use variantsmith_protocols::{
    CompletionRequest, LLMProvider, Message, ProviderError, ProviderSettings, StopReason, Usage,
};

/// Builds a provider client for resolved settings.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, settings: &ProviderSettings) -> Result<Arc<dyn LLMProvider>, ProviderError>;
}

/// Normalized result of one model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReply {
    pub content: String,
    pub usage: Usage,
    pub model: String,
    pub stop_reason: StopReason,
}

#[derive(Clone)]
pub struct ProviderGateway {
    factory: Arc<dyn ProviderFactory>,
    max_request_bytes: usize,
}

impl ProviderGateway {
    pub fn new(factory: Arc<dyn ProviderFactory>, max_request_bytes: usize) -> Self {
        Self {
            factory,
            max_request_bytes,
        }
    }

    pub fn from_config(factory: Arc<dyn ProviderFactory>, config: &GatewayConfig) -> Self {
        Self::new(factory, config.max_request_bytes)
    }

    pub fn max_request_bytes(&self) -> usize {
        self.max_request_bytes
    }

    /// Send one request and normalize the reply.
    pub async fn call_model(
        &self,
        system: &str,
        messages: Vec<Message>,
        settings: &ProviderSettings,
    ) -> Result<ModelReply, ProviderError> {
        let request = build_request(system, messages, settings);

        let size = serde_json::to_vec(&request)
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?
            .len();
        if size > self.max_request_bytes {
            let err = ProviderError::PayloadTooLarge {
                size,
                limit: self.max_request_bytes,
            };
            warn!(provider = %settings.provider, size, limit = self.max_request_bytes, "{}", err.remediation(settings.provider));
            return Err(err);
        }

        let provider = self.factory.create(settings)?;
        debug!(provider = %settings.provider, model = %settings.model, bytes = size, "Calling model");

        let response = provider.complete(request).await.map_err(|e| {
            warn!(
                provider = %settings.provider,
                kind = ?e.kind(),
                hint = %e.remediation(settings.provider),
                "Model call failed: {}",
                e
            );
            e
        })?;

        let content = response.text();
        if response.stop_reason == StopReason::ContentFiltered {
            return Err(empty_response(settings, "the provider filtered the content"));
        }
        if content.trim().is_empty() {
            let reason = match response.stop_reason {
                StopReason::MaxTokens => "the token limit was exhausted before any content",
                _ => "the provider returned no content",
            };
            return Err(empty_response(settings, reason));
        }
        if response.stop_reason == StopReason::MaxTokens {
            warn!(
                provider = %settings.provider,
                max_tokens = settings.max_tokens,
                "Model reply was truncated at the token limit"
            );
        }

        info!(
            provider = %settings.provider,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Model call completed"
        );

        Ok(ModelReply {
            content,
            usage: response.usage,
            model: response.model,
            stop_reason: response.stop_reason,
        })
    }
}

fn build_request(system: &str, messages: Vec<Message>, settings: &ProviderSettings) -> CompletionRequest {
    let mut request = CompletionRequest::new(&settings.model, messages)
        .with_max_tokens(settings.max_tokens)
        .with_timeout(settings.request_timeout_seconds);
    if !system.trim().is_empty() {
        request = request.with_system(system);
    }
    if let Some(temperature) = settings.temperature {
        request = request.with_temperature(temperature);
    }
    request
}

fn empty_response(settings: &ProviderSettings, reason: &str) -> ProviderError {
    let err = ProviderError::EmptyResponse {
        reason: reason.to_string(),
    };
    warn!(provider = %settings.provider, "{}", err.remediation(settings.provider));
    err
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
