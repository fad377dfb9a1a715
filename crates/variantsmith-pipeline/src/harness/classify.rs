use variantsmith_protocols::{SandboxError, TestFailureKind};

/// Classify a failure message reported by the page or the sandbox.
pub fn classify_message(message: &str) -> TestFailureKind {
    let lower = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if has(&["timeout", "timed out"]) {
        TestFailureKind::Timeout
    } else if has(&["element not found", "not found:", "no element", "failed to find"]) {
        TestFailureKind::SelectorNotFound
    } else if has(&["no validations", "no result"]) {
        TestFailureKind::NoResults
    } else if has(&[
        "tab error",
        "tab closed",
        "tab was closed",
        "no tab with id",
        "receiving end does not exist",
        "cannot access",
        "frame was removed",
    ]) {
        TestFailureKind::TabError
    } else if has(&[
        "typeerror",
        "referenceerror",
        "syntaxerror",
        "rangeerror",
        "is not defined",
        "is not a function",
        "cannot read properties",
        "unexpected token",
    ]) {
        TestFailureKind::JavascriptError
    } else {
        TestFailureKind::Unknown
    }
}

/// Classify an error raised by the sandbox itself.
pub fn classify_sandbox_error(error: &SandboxError) -> TestFailureKind {
    match error {
        SandboxError::Timeout(_) => TestFailureKind::Timeout,
        SandboxError::TabError(_) | SandboxError::Unavailable(_) => TestFailureKind::TabError,
        SandboxError::ScriptError(message) => match classify_message(message) {
            TestFailureKind::Unknown => TestFailureKind::JavascriptError,
            kind => kind,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_messages() {
        assert_eq!(classify_message("Script timed out"), TestFailureKind::Timeout);
        assert_eq!(
            classify_message("Element not found: #cta (waited 5000 ms)"),
            TestFailureKind::SelectorNotFound
        );
        assert_eq!(classify_message("No validations were recorded"), TestFailureKind::NoResults);
        assert_eq!(
            classify_message("Could not establish connection. Receiving end does not exist."),
            TestFailureKind::TabError
        );
        assert_eq!(
            classify_message("TypeError: Cannot read properties of null"),
            TestFailureKind::JavascriptError
        );
        assert_eq!(classify_message("something odd"), TestFailureKind::Unknown);
    }

    #[test]
    fn test_classify_sandbox_errors() {
        assert_eq!(classify_sandbox_error(&SandboxError::Timeout(10)), TestFailureKind::Timeout);
        assert_eq!(
            classify_sandbox_error(&SandboxError::TabError("closed".to_string())),
            TestFailureKind::TabError
        );
        assert_eq!(
            classify_sandbox_error(&SandboxError::ScriptError("boom".to_string())),
            TestFailureKind::JavascriptError
        );
    }
}
