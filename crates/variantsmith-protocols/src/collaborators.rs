//! Interfaces to the external page collaborators.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::code::CodePayload;
use crate::error::SandboxError;
use crate::page::ElementDatabase;

/// Result of one page capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPage {
    pub database: ElementDatabase,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Page capture/extraction service.
///
/// Selectors it returns are treated as verified ground truth.
#[async_trait]
pub trait PageCapture: Send + Sync {
    /// Capture the element database (and a screenshot when available) for `target`.
    async fn capture(&self, target: &str) -> Result<CapturedPage, SandboxError>;

    /// Take a screenshot of `target` as a data URL.
    async fn screenshot(&self, target: &str) -> Result<String, SandboxError>;
}

/// In-page execution sandbox.
#[async_trait]
pub trait PageSandbox: Send + Sync {
    /// Run an assembled script and return the value it resolved to, if any.
    async fn execute_script(
        &self,
        target: &str,
        script: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, SandboxError>;

    /// Inject CSS/JS for one variation.
    async fn apply_code(&self, target: &str, payload: &CodePayload) -> Result<(), SandboxError>;
}
