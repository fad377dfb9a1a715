//! Visual QA verdict.

use serde::{Deserialize, Serialize};

/// Structured judgement of a before/after comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaVerdict {
    pub passed: bool,

    pub changes_detected: bool,

    /// 0-100.
    pub correctness_score: u8,

    #[serde(default)]
    pub issues: Vec<String>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub recommendations: Vec<String>,

    /// False when the model answered in prose and the verdict was inferred.
    #[serde(default = "default_structured")]
    pub structured: bool,
}

fn default_structured() -> bool {
    true
}
