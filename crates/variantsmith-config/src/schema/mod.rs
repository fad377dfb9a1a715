//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod schema_runtime;

pub use schema_runtime::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub adjustment: AdjustmentConfig,

    #[serde(default)]
    pub visual_qa: VisualQaConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub harness: HarnessConfig,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

/// Initial generation settings. Also the fallback for later stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    pub model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    pub temperature: Option<f32>,

    /// Element records serialized into one prompt.
    #[serde(default = "default_max_elements")]
    pub max_elements: usize,

    /// Characters of element text kept after compaction.
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,

    #[serde(default = "default_true")]
    pub attach_screenshot: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            max_elements: default_max_elements(),
            text_limit: default_text_limit(),
            attach_screenshot: true,
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_elements() -> usize {
    400
}

fn default_text_limit() -> usize {
    80
}

/// Iterative adjustment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    pub provider: Option<String>,

    pub model: Option<String>,

    pub max_tokens: Option<u32>,

    /// Turns of conversation history kept in a session.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Carry forward code for selectors an adjustment turn dropped.
    #[serde(default = "default_true")]
    pub enforce_additive: bool,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            max_tokens: None,
            max_history_turns: default_max_history_turns(),
            enforce_additive: true,
        }
    }
}

fn default_max_history_turns() -> usize {
    10
}

/// Visual QA settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualQaConfig {
    pub provider: Option<String>,

    pub model: Option<String>,

    #[serde(default = "default_qa_max_tokens")]
    pub max_tokens: u32,
}

impl Default for VisualQaConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            max_tokens: default_qa_max_tokens(),
        }
    }
}

fn default_qa_max_tokens() -> u32 {
    1500
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
