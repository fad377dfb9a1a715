//! Resolved provider settings threaded through one pipeline turn.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The LLM providers the gateway knows how to shape requests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
}

impl ProviderKind {
    /// Stable identifier, matching the config section name.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAI => "openai",
        }
    }

    /// Human-readable provider name used in remediation hints.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::OpenAI => "OpenAI",
        }
    }

    /// Environment variable consulted when the config has no API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Model used when neither the stage nor the provider section names one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::OpenAI => "gpt-4o",
        }
    }

    pub fn all() -> [ProviderKind; 2] {
        [ProviderKind::Anthropic, ProviderKind::OpenAI]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "gpt" => Ok(ProviderKind::OpenAI),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Immutable provider configuration for one call.
///
/// Resolved once per turn from configuration and passed by value; nothing
/// downstream reads provider settings from anywhere else.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub request_timeout_seconds: u64,
}

impl ProviderSettings {
    pub fn new(provider: ProviderKind, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            base_url: None,
            max_tokens: 4096,
            temperature: None,
            request_timeout_seconds: 120,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// API keys stay out of logs.
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_serialization() {
        assert_eq!(serde_json::to_string(&ProviderKind::OpenAI).unwrap(), "\"openai\"");
        assert_eq!(serde_json::to_string(&ProviderKind::Anthropic).unwrap(), "\"anthropic\"");
    }

    #[test]
    fn test_provider_kind_env_vars() {
        assert_eq!(ProviderKind::Anthropic.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderKind::OpenAI.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_settings_debug_hides_key() {
        let settings = ProviderSettings::new(ProviderKind::OpenAI, "gpt-4o", "sk-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4o"));
    }

    #[test]
    fn test_settings_builder() {
        let settings = ProviderSettings::new(ProviderKind::Anthropic, "claude", "key")
            .with_base_url("http://localhost:9999")
            .with_max_tokens(8000)
            .with_temperature(0.2);
        assert_eq!(settings.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(settings.max_tokens, 8000);
        assert_eq!(settings.temperature, Some(0.2));
    }
}
