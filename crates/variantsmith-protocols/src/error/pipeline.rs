//! Top-level pipeline errors.

use thiserror::Error;

use super::{HarnessError, ProviderError, SandboxError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid configuration; fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("Page operation '{operation}' exceeded {timeout_ms} ms")]
    PageTimeout { operation: String, timeout_ms: u64 },

    /// A newer request for the same target started; this result is stale.
    #[error("Request for '{target}' was superseded by a newer request")]
    Superseded { target: String },
}
