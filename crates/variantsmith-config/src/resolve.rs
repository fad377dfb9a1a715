//! Per-stage provider settings resolution.
//!
//! One canonical order for every stage:
//!
//! 1. provider: stage `provider`, else `generation.provider`
//! 2. model: stage `model`, else `generation.model` when the stage kept the
//!    generation provider, else `providers.<id>.default_model`, else the
//!    provider's built-in default
//! 3. api key: `providers.<id>.api_key`, else the provider's env var

use std::fmt;

use tracing::debug;
use variantsmith_protocols::{ProviderKind, ProviderSettings};

use crate::error::ConfigError;
use crate::schema::Config;

/// Pipeline stage that needs a model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Generation,
    Adjustment,
    VisualQa,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Generation => f.write_str("generation"),
            Stage::Adjustment => f.write_str("adjustment"),
            Stage::VisualQa => f.write_str("visual_qa"),
        }
    }
}

impl Config {
    /// Resolve provider settings for `stage`, reading credentials from the
    /// process environment when the config has none.
    pub fn resolve_provider(&self, stage: Stage) -> Result<ProviderSettings, ConfigError> {
        self.resolve_provider_with(stage, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::resolve_provider`] with an explicit env lookup.
    pub fn resolve_provider_with<F>(&self, stage: Stage, env: F) -> Result<ProviderSettings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (stage_provider, stage_model) = match stage {
            Stage::Generation => (None, None),
            Stage::Adjustment => (
                self.adjustment.provider.as_deref(),
                self.adjustment.model.as_deref(),
            ),
            Stage::VisualQa => (
                self.visual_qa.provider.as_deref(),
                self.visual_qa.model.as_deref(),
            ),
        };

        let provider_name = stage_provider.unwrap_or(self.generation.provider.as_str());
        let provider: ProviderKind = provider_name
            .parse()
            .map_err(|_| ConfigError::UnknownProvider(provider_name.to_string()))?;
        let overridden = stage_provider
            .map(|name| name.parse::<ProviderKind>().ok() != self.generation.provider.parse().ok())
            .unwrap_or(false);

        let section = self.providers.get(provider.id());

        let model = stage_model
            .map(str::to_string)
            .or_else(|| {
                if overridden {
                    None
                } else {
                    self.generation.model.clone()
                }
            })
            .or_else(|| section.and_then(|s| s.default_model.clone()))
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_key = section
            .and_then(|s| s.api_key.clone())
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env(provider.api_key_env()).filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingCredentials {
                provider: provider.id().to_string(),
                env_var: provider.api_key_env().to_string(),
            })?;

        let max_tokens = match stage {
            Stage::Generation => self.generation.max_tokens,
            Stage::Adjustment => self.adjustment.max_tokens.unwrap_or(self.generation.max_tokens),
            Stage::VisualQa => self.visual_qa.max_tokens,
        };

        let mut settings = ProviderSettings::new(provider, model, api_key).with_max_tokens(max_tokens);
        settings.request_timeout_seconds = self.gateway.request_timeout_seconds;
        if let Some(url) = section.and_then(|s| s.base_url.clone()) {
            settings = settings.with_base_url(url);
        }
        if stage != Stage::VisualQa {
            if let Some(t) = self.generation.temperature {
                settings = settings.with_temperature(t);
            }
        }

        debug!(%stage, provider = %settings.provider, model = %settings.model, "Resolved provider settings");
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
