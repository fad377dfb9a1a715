//! Visual QA Evaluator.
//!
//! A vision model compares before/after screenshots against the request.
//! Behavioral test results shift its confidence, and its answer is
//! recovered with the same JSON cascade as generation replies.

use std::fmt::Write;

use serde_json::Value;
use tracing::{info, warn};
use variantsmith_protocols::{
    GeneratedCode, ImageSource, Message, OverallStatus, ProviderError, ProviderSettings, QaVerdict,
    TestExecutionResult,
};

use crate::feedback::AUTOMATED_FEEDBACK_MARKER;
use crate::gateway::ProviderGateway;
use crate::parser::extract_json_where;

pub const QA_SYSTEM_PROMPT: &str = "You are a meticulous visual QA reviewer for A/B test variations. \
You compare BEFORE and AFTER screenshots of a web page and judge whether the requested change was \
applied correctly and without side effects. You answer with a single JSON object.";

pub struct VisualQaEvaluator {
    gateway: ProviderGateway,
}

impl VisualQaEvaluator {
    pub fn new(gateway: ProviderGateway) -> Self {
        Self { gateway }
    }

    /// Judge one before/after pair.
    pub async fn evaluate(
        &self,
        before_image: &str,
        after_image: &str,
        request: &str,
        code: &GeneratedCode,
        test_result: Option<&TestExecutionResult>,
        settings: &ProviderSettings,
    ) -> Result<QaVerdict, ProviderError> {
        let prompt = build_qa_prompt(request, code, test_result);
        let images = vec![
            ImageSource::from_data_url(before_image),
            ImageSource::from_data_url(after_image),
        ];
        let reply = self
            .gateway
            .call_model(QA_SYSTEM_PROMPT, vec![Message::user_with_images(prompt, images)], settings)
            .await?;

        let verdict = parse_verdict(&reply.content);
        info!(
            passed = verdict.passed,
            score = verdict.correctness_score,
            structured = verdict.structured,
            "Visual QA completed"
        );
        Ok(verdict)
    }
}

fn test_framing(test_result: Option<&TestExecutionResult>) -> String {
    match test_result {
        None => "No behavioral test was run. Judge from the screenshots alone; do not adjust your confidence either way.".to_string(),
        Some(result) => {
            let counts = format!("{} of {} validation(s) passed", result.passed_count(), result.validations.len());
            match result.overall_status {
                OverallStatus::Passed => format!(
                    "Behavioral tests PASSED ({}). The code demonstrably works in the page; raise your confidence accordingly.",
                    counts
                ),
                OverallStatus::Failed => format!(
                    "Behavioral tests FAILED ({}). Lower your confidence and look for the visible cause of the failures.",
                    counts
                ),
                OverallStatus::Error => format!(
                    "Behavioral tests could not complete ({}). Lower your confidence; the code may not have run as intended.",
                    result.error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
    }
}

/// Prompt text for one evaluation.
pub fn build_qa_prompt(request: &str, code: &GeneratedCode, test_result: Option<&TestExecutionResult>) -> String {
    let mut prompt = String::new();
    prompt.push_str("The FIRST image is the page BEFORE the change. The SECOND image is the page AFTER the change.\n\n");
    let _ = writeln!(prompt, "## REQUESTED CHANGE\n{}\n", request.trim());

    let code_json = serde_json::to_string_pretty(code).unwrap_or_default();
    let _ = writeln!(prompt, "## APPLIED CODE\n```json\n{}\n```\n", code_json);

    let _ = writeln!(prompt, "## BEHAVIORAL TESTS\n{}", test_framing(test_result));
    if let Some(result) = test_result {
        for failure in result.failures() {
            let _ = writeln!(prompt, "- failed: {} (expected {}, got {})", failure.test, failure.expected, failure.actual);
        }
    }
    prompt.push('\n');

    prompt.push_str(
        r#"## RESPONSE FORMAT
Respond with ONE JSON object and nothing else:
{
  "passed": true,
  "changesDetected": true,
  "correctnessScore": 0-100,
  "issues": ["..."],
  "message": "one-sentence summary",
  "recommendations": ["..."]
}
"#,
    );
    prompt
}

fn looks_like_verdict(value: &Value) -> bool {
    ["passed", "correctnessScore", "changesDetected"]
        .iter()
        .any(|key| value.get(key).is_some())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Recover a verdict from model text. Prose without JSON becomes an
/// unstructured, not-passed verdict carrying the text as its message.
pub fn parse_verdict(text: &str) -> QaVerdict {
    let Some(value) = extract_json_where(text, looks_like_verdict) else {
        warn!("Visual QA reply had no JSON verdict; passing prose through");
        return QaVerdict {
            message: text.trim().to_string(),
            structured: false,
            ..Default::default()
        };
    };

    let score = lenient_number(value.get("correctnessScore"))
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
        .round() as u8;
    QaVerdict {
        passed: lenient_bool(value.get("passed")).unwrap_or(false),
        changes_detected: lenient_bool(value.get("changesDetected")).unwrap_or(false),
        correctness_score: score,
        issues: string_list(value.get("issues")),
        message: value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        recommendations: string_list(value.get("recommendations")),
        structured: true,
    }
}

/// Numbers may arrive quoted, e.g. `"85"` or `"85%"`.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn lenient_bool(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Feedback for the next adjustment turn, when the verdict calls for one.
pub fn feedback_for_adjustment(verdict: &QaVerdict) -> Option<String> {
    if !verdict.structured || (verdict.passed && verdict.issues.is_empty()) {
        return None;
    }
    let mut out = format!(
        "{} Visual QA {} (score {}/100): {}\n",
        AUTOMATED_FEEDBACK_MARKER,
        if verdict.passed { "passed with issues" } else { "FAILED" },
        verdict.correctness_score,
        verdict.message.trim()
    );
    for issue in &verdict.issues {
        let _ = writeln!(out, "- Issue: {}", issue);
    }
    for recommendation in &verdict.recommendations {
        let _ = writeln!(out, "- Fix: {}", recommendation);
    }
    Some(out)
}

#[cfg(test)]
#[path = "qa_tests.rs"]
mod tests;
