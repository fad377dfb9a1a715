//! In-page test execution results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One simulated interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    #[serde(rename = "type")]
    pub interaction_type: String,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub success: bool,
}

/// One recorded assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub test: String,

    pub passed: bool,

    #[serde(default)]
    pub expected: serde_json::Value,

    #[serde(default)]
    pub actual: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Passed,
    Failed,
    #[default]
    Error,
}

/// Outcome of one test run. Never mutated after it is produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestExecutionResult {
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,

    #[serde(default)]
    pub validations: Vec<ValidationRecord>,

    #[serde(default)]
    pub overall_status: OverallStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestExecutionResult {
    /// Validations that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationRecord> {
        self.validations.iter().filter(|v| !v.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.validations.iter().filter(|v| v.passed).count()
    }

    /// The test function ran to completion (pass or fail).
    pub fn completed(&self) -> bool {
        matches!(self.overall_status, OverallStatus::Passed | OverallStatus::Failed)
    }
}

/// Terminal classification of a failed test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestFailureKind {
    Timeout,
    SelectorNotFound,
    NoResults,
    JavascriptError,
    TabError,
    Unknown,
}

impl fmt::Display for TestFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestFailureKind::Timeout => "timeout",
            TestFailureKind::SelectorNotFound => "selector-not-found",
            TestFailureKind::NoResults => "no-results",
            TestFailureKind::JavascriptError => "javascript-error",
            TestFailureKind::TabError => "tab-error",
            TestFailureKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A completed run together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunReport {
    pub result: TestExecutionResult,

    /// Attempts made, including the successful one.
    pub attempts: u32,

    /// Timeout applied to the final attempt.
    pub timeout_ms: u64,
}
