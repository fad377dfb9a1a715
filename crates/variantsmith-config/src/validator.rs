//! Configuration validation.

use variantsmith_protocols::ProviderKind;

use crate::error::ConfigError;
use crate::resolve::Stage;
use crate::schema::Config;

/// Below this request ceiling a screenshot alone can exceed the budget.
const SMALL_REQUEST_CEILING: usize = 500_000;

/// Hard ceiling for a single test run, retries included.
const TEST_TIMEOUT_CEILING_MS: u64 = 20_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_providers(config, &mut result);
        Self::validate_stages(config, &mut result);
        Self::validate_gateway(config, &mut result);
        Self::validate_harness(config, &mut result);
        Self::validate_cache(config, &mut result);

        Ok(result)
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if name.parse::<ProviderKind>().is_err() {
                result.add_error(ValidationError::new(
                    format!("providers.{}", name),
                    format!("Unknown provider '{}', valid values: anthropic, openai", name),
                ));
                continue;
            }

            if let Some(url) = &provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }
        }
    }

    fn validate_stages(config: &Config, result: &mut ValidationResult) {
        let stages = [
            ("generation.provider", Some(config.generation.provider.as_str())),
            ("adjustment.provider", config.adjustment.provider.as_deref()),
            ("visual_qa.provider", config.visual_qa.provider.as_deref()),
        ];
        for (path, provider) in stages {
            if let Some(name) = provider {
                if name.parse::<ProviderKind>().is_err() {
                    result.add_error(ValidationError::new(
                        path,
                        format!("Unknown provider '{}', valid values: anthropic, openai", name),
                    ));
                }
            }
        }

        if config.generation.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "generation.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if config.generation.max_elements == 0 {
            result.add_error(ValidationError::new(
                "generation.max_elements",
                "max_elements must be greater than 0",
            ));
        }

        if config.adjustment.max_history_turns == 0 {
            result.add_warning(ValidationWarning::new(
                "adjustment.max_history_turns",
                "max_history_turns is 0, adjustments will not see earlier turns",
            ));
        }

        // Missing credentials only matter for stages that will actually run.
        for stage in [Stage::Generation, Stage::Adjustment, Stage::VisualQa] {
            if let Err(ConfigError::MissingCredentials { provider, env_var }) = config.resolve_provider(stage) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.api_key", provider),
                    format!("API key is not set for the {} stage; set it here or via {}", stage, env_var),
                ));
            }
        }
    }

    fn validate_gateway(config: &Config, result: &mut ValidationResult) {
        if config.gateway.max_request_bytes == 0 {
            result.add_error(ValidationError::new(
                "gateway.max_request_bytes",
                "max_request_bytes must be greater than 0",
            ));
        } else if config.gateway.max_request_bytes < SMALL_REQUEST_CEILING {
            result.add_warning(ValidationWarning::new(
                "gateway.max_request_bytes",
                "max_request_bytes is very small, requests with screenshots will be rejected",
            ));
        }

        if config.gateway.request_timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "gateway.request_timeout_seconds",
                "request_timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_harness(config: &Config, result: &mut ValidationResult) {
        let harness = &config.harness;
        if harness.default_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "harness.default_timeout_ms",
                "default_timeout_ms must be greater than 0",
            ));
        }

        if harness.max_timeout_ms > TEST_TIMEOUT_CEILING_MS {
            result.add_error(ValidationError::new(
                "harness.max_timeout_ms",
                format!(
                    "max_timeout_ms ({}) exceeds the {} ms test ceiling",
                    harness.max_timeout_ms, TEST_TIMEOUT_CEILING_MS
                ),
            ));
        }

        if harness.default_timeout_ms > harness.max_timeout_ms {
            result.add_error(ValidationError::new(
                "harness.default_timeout_ms",
                format!(
                    "default_timeout_ms ({}) exceeds max_timeout_ms ({})",
                    harness.default_timeout_ms, harness.max_timeout_ms
                ),
            ));
        }

        if harness.backoff_multiplier < 1.0 {
            result.add_error(ValidationError::new(
                "harness.backoff_multiplier",
                "backoff_multiplier must be at least 1.0",
            ));
        }

        if harness.max_retries > 5 {
            result.add_warning(ValidationWarning::new(
                "harness.max_retries",
                "max_retries is high (>5), a broken test may stall the session",
            ));
        }

        if config.page.operation_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "page.operation_timeout_ms",
                "operation_timeout_ms must be greater than 0",
            ));
        }
    }

    fn validate_cache(config: &Config, result: &mut ValidationResult) {
        if config.cache.capacity == 0 {
            result.add_error(ValidationError::new(
                "cache.capacity",
                "capacity must be greater than 0",
            ));
        }

        if config.cache.ttl_seconds == 0 {
            result.add_warning(ValidationWarning::new(
                "cache.ttl_seconds",
                "ttl_seconds is 0, every capture will miss the cache",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
