//! LLM Provider errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderKind;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("Payload too large: {size} bytes exceeds the {limit} byte ceiling")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Provider unavailable: {status} - {message}")]
    Unavailable { status: u16, message: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Empty response: {reason}")]
    EmptyResponse { reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

/// Failure classes callers branch on when choosing a recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFailureKind {
    AuthInvalid,
    RateLimited,
    PayloadTooLarge,
    ProviderUnavailable,
    EmptyResponse,
    Transport,
    InvalidRequest,
}

impl ProviderError {
    /// Map a non-2xx HTTP response to a typed error.
    pub fn from_api_response(status: u16, message: String, retry_after_seconds: Option<u64>) -> Self {
        match status {
            401 | 403 => ProviderError::AuthenticationFailed(message),
            429 => ProviderError::RateLimited {
                message,
                retry_after_seconds,
            },
            500..=599 => ProviderError::Unavailable { status, message },
            _ => ProviderError::ApiError { status, message },
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ProviderFailureKind {
        match self {
            ProviderError::AuthenticationFailed(_) => ProviderFailureKind::AuthInvalid,
            ProviderError::RateLimited { .. } => ProviderFailureKind::RateLimited,
            ProviderError::PayloadTooLarge { .. } => ProviderFailureKind::PayloadTooLarge,
            ProviderError::ApiError { status: 413, .. } => ProviderFailureKind::PayloadTooLarge,
            ProviderError::Unavailable { .. } => ProviderFailureKind::ProviderUnavailable,
            ProviderError::EmptyResponse { .. } => ProviderFailureKind::EmptyResponse,
            ProviderError::Network(_) | ProviderError::Timeout(_) => ProviderFailureKind::Transport,
            ProviderError::NotFound(_)
            | ProviderError::ApiError { .. }
            | ProviderError::InvalidRequest(_) => ProviderFailureKind::InvalidRequest,
        }
    }

    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ProviderFailureKind::RateLimited
                | ProviderFailureKind::ProviderUnavailable
                | ProviderFailureKind::Transport
        )
    }

    /// Provider-specific remediation hint for this failure.
    pub fn remediation(&self, provider: ProviderKind) -> String {
        let name = provider.display_name();
        match (self.kind(), provider) {
            (ProviderFailureKind::AuthInvalid, ProviderKind::Anthropic) => {
                "Check the Anthropic API key in settings; Anthropic keys start with 'sk-ant-' and are managed at console.anthropic.com.".to_string()
            }
            (ProviderFailureKind::AuthInvalid, ProviderKind::OpenAI) => {
                "Check the OpenAI API key in settings and that the key's project has access to the selected model (platform.openai.com/api-keys).".to_string()
            }
            (ProviderFailureKind::RateLimited, ProviderKind::Anthropic) => {
                "Anthropic rate limit reached; wait a minute before retrying or lower max_tokens.".to_string()
            }
            (ProviderFailureKind::RateLimited, ProviderKind::OpenAI) => {
                "OpenAI rate or usage limit reached; wait before retrying and check the account's billing quota.".to_string()
            }
            (ProviderFailureKind::PayloadTooLarge, _) => format!(
                "The request is too large for {}; focus the capture on one section or drop the screenshot.",
                name
            ),
            (ProviderFailureKind::ProviderUnavailable, ProviderKind::Anthropic) => {
                "Anthropic is overloaded or unavailable; retry shortly or switch the provider to OpenAI.".to_string()
            }
            (ProviderFailureKind::ProviderUnavailable, ProviderKind::OpenAI) => {
                "OpenAI is unavailable; retry shortly or switch the provider to Anthropic.".to_string()
            }
            (ProviderFailureKind::EmptyResponse, _) => format!(
                "{} returned no usable content; simplify the request or reduce the page scope rather than retrying unchanged.",
                name
            ),
            (ProviderFailureKind::Transport, _) => format!(
                "Could not reach {}; check the network connection and retry.",
                name
            ),
            (ProviderFailureKind::InvalidRequest, _) => format!(
                "{} rejected the request; verify the model name and request parameters.",
                name
            ),
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
