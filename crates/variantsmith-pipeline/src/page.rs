//! Page-interaction operations raced against a hard ceiling.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use variantsmith_config::PageConfig;
use variantsmith_protocols::{CapturedPage, CodePayload, PageCapture, PageSandbox, PipelineError, SandboxError};

#[derive(Clone)]
pub struct PageOperations {
    capture: Arc<dyn PageCapture>,
    sandbox: Arc<dyn PageSandbox>,
    timeout: Duration,
}

impl PageOperations {
    pub fn new(capture: Arc<dyn PageCapture>, sandbox: Arc<dyn PageSandbox>, timeout: Duration) -> Self {
        Self {
            capture,
            sandbox,
            timeout,
        }
    }

    pub fn from_config(capture: Arc<dyn PageCapture>, sandbox: Arc<dyn PageSandbox>, config: &PageConfig) -> Self {
        Self::new(capture, sandbox, Duration::from_millis(config.operation_timeout_ms))
    }

    pub fn sandbox(&self) -> Arc<dyn PageSandbox> {
        self.sandbox.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        target: &str,
        fut: impl Future<Output = Result<T, SandboxError>>,
    ) -> Result<T, PipelineError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(operation, page = %target, timeout_ms, "Page operation timed out");
                Err(PipelineError::PageTimeout {
                    operation: operation.to_string(),
                    timeout_ms,
                })
            }
        }
    }

    pub async fn capture(&self, target: &str) -> Result<CapturedPage, PipelineError> {
        self.bounded("capture", target, self.capture.capture(target)).await
    }

    pub async fn screenshot(&self, target: &str) -> Result<String, PipelineError> {
        self.bounded("screenshot", target, self.capture.screenshot(target)).await
    }

    pub async fn apply(&self, target: &str, payload: &CodePayload) -> Result<(), PipelineError> {
        self.bounded("apply", target, self.sandbox.apply_code(target, payload)).await
    }
}
