//! Errors reported by the external page collaborators.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SandboxError {
    #[error("Tab error: {0}")]
    TabError(String),

    #[error("Script error: {0}")]
    ScriptError(String),

    #[error("Page operation timed out after {0} ms")]
    Timeout(u64),

    #[error("Sandbox unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_error_display() {
        assert!(SandboxError::TabError("closed".to_string()).to_string().contains("Tab error"));
        assert!(SandboxError::Timeout(5000).to_string().contains("5000"));
    }
}
