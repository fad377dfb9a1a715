//! Page collaborators for command-line use.
//!
//! Without a browser attached, pages come from capture files written by the
//! extraction service and the sandbox reports itself unavailable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use variantsmith_protocols::{
    CapturedPage, CodePayload, ElementDatabase, PageCapture, PageSandbox, SandboxError,
};

/// Get the .variantsmith directory path.
pub(crate) fn variantsmith_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".variantsmith"))
        .unwrap_or_else(|| PathBuf::from(".variantsmith"))
}

/// Parse a capture file: either `{database, screenshot}` or a bare element
/// database.
pub(crate) fn parse_capture(content: &str) -> Result<CapturedPage, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.get("database").is_some() {
        serde_json::from_value(value)
    } else {
        Ok(CapturedPage {
            database: serde_json::from_value::<ElementDatabase>(value)?,
            screenshot: None,
        })
    }
}

pub(crate) fn load_capture(path: &Path) -> anyhow::Result<CapturedPage> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_capture(&content)?)
}

/// Serves every target from one capture file.
pub(crate) struct FilePageCapture {
    path: PathBuf,
}

impl FilePageCapture {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<CapturedPage, SandboxError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SandboxError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        parse_capture(&content)
            .map_err(|e| SandboxError::Unavailable(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl PageCapture for FilePageCapture {
    async fn capture(&self, target: &str) -> Result<CapturedPage, SandboxError> {
        debug!(page = %target, file = %self.path.display(), "Loading capture file");
        let mut page = self.read().await?;
        if page.database.metadata.url.is_empty() {
            page.database.metadata.url = target.to_string();
        }
        Ok(page)
    }

    async fn screenshot(&self, _target: &str) -> Result<String, SandboxError> {
        self.read()
            .await?
            .screenshot
            .ok_or_else(|| SandboxError::Unavailable("capture file has no screenshot".to_string()))
    }
}

/// Stand-in for the in-page sandbox when no browser is attached.
pub(crate) struct DetachedSandbox;

#[async_trait]
impl PageSandbox for DetachedSandbox {
    async fn execute_script(
        &self,
        _target: &str,
        _script: &str,
        _timeout: Duration,
    ) -> Result<Option<serde_json::Value>, SandboxError> {
        Err(SandboxError::Unavailable("no browser attached".to_string()))
    }

    async fn apply_code(&self, _target: &str, _payload: &CodePayload) -> Result<(), SandboxError> {
        Err(SandboxError::Unavailable("no browser attached".to_string()))
    }
}
