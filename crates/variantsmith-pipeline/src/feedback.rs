//! Automated feedback passed between the harness, Visual QA and the
//! adjustment engine.

use std::fmt::Write;

use variantsmith_protocols::{OverallStatus, TestExecutionResult};

/// Prefix identifying feedback produced by automated QA rather than a person.
pub const AUTOMATED_FEEDBACK_MARKER: &str = "[AUTOMATED QA FEEDBACK]";

/// Whether `feedback` came from automated QA.
pub fn is_automated(feedback: &str) -> bool {
    feedback.contains(AUTOMATED_FEEDBACK_MARKER)
}

/// Render a test run as feedback for the next adjustment turn.
pub fn summarize_test_result(result: &TestExecutionResult) -> String {
    let status = match result.overall_status {
        OverallStatus::Passed => "PASSED",
        OverallStatus::Failed => "FAILED",
        OverallStatus::Error => "ERROR",
    };
    let mut out = format!(
        "{} Behavioral test {}: {} of {} validation(s) passed.\n",
        AUTOMATED_FEEDBACK_MARKER,
        status,
        result.passed_count(),
        result.validations.len()
    );

    if result.failures().next().is_some() {
        out.push_str("Failed validations:\n");
        for failure in result.failures() {
            let _ = writeln!(
                out,
                "- {}: expected {}, got {}",
                failure.test, failure.expected, failure.actual
            );
        }
    }

    let failed_interactions: Vec<_> = result.interactions.iter().filter(|i| !i.success).collect();
    if !failed_interactions.is_empty() {
        out.push_str("Failed interactions:\n");
        for interaction in failed_interactions {
            let _ = writeln!(out, "- {} on {}", interaction.interaction_type, interaction.target);
        }
    }

    if let Some(error) = result.error.as_deref().filter(|e| !e.trim().is_empty()) {
        let _ = writeln!(out, "Error: {}", error.trim());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use variantsmith_protocols::{InteractionRecord, ValidationRecord};

    #[test]
    fn test_summary_lists_failures() {
        let result = TestExecutionResult {
            interactions: vec![
                InteractionRecord {
                    interaction_type: "click".to_string(),
                    target: "#cta".to_string(),
                    success: true,
                },
                InteractionRecord {
                    interaction_type: "hover".to_string(),
                    target: "nav a".to_string(),
                    success: false,
                },
            ],
            validations: vec![
                ValidationRecord {
                    test: "CTA text".to_string(),
                    passed: true,
                    expected: "Start Free Trial".into(),
                    actual: "Start Free Trial".into(),
                },
                ValidationRecord {
                    test: "CTA color".to_string(),
                    passed: false,
                    expected: "rgb(22, 163, 74)".into(),
                    actual: "rgb(255, 0, 0)".into(),
                },
            ],
            overall_status: OverallStatus::Failed,
            error: None,
        };
        let summary = summarize_test_result(&result);
        assert!(summary.starts_with(AUTOMATED_FEEDBACK_MARKER));
        assert!(summary.contains("FAILED: 1 of 2"));
        assert!(summary.contains("- CTA color: expected \"rgb(22, 163, 74)\", got \"rgb(255, 0, 0)\""));
        assert!(summary.contains("- hover on nav a"));
        assert!(!summary.contains("CTA text"));
        assert!(is_automated(&summary));
    }

    #[test]
    fn test_summary_includes_error() {
        let result = TestExecutionResult {
            error: Some("Element not found: #cta".to_string()),
            ..Default::default()
        };
        let summary = summarize_test_result(&result);
        assert!(summary.contains("ERROR"));
        assert!(summary.contains("Error: Element not found: #cta"));
    }

    #[test]
    fn test_human_feedback_is_not_automated() {
        assert!(!is_automated("make the text bigger"));
    }
}
