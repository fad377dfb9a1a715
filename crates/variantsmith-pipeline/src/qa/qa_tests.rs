use super::*;
use crate::test_support::{ScriptedProvider, gateway, settings};
use variantsmith_protocols::{ContentPart, MessageContent, ValidationRecord, Variation};

fn code() -> GeneratedCode {
    GeneratedCode::new(vec![Variation::new(1, "Green CTA").with_css("#cta { background: green; }")])
}

fn result(status: OverallStatus) -> TestExecutionResult {
    TestExecutionResult {
        validations: vec![ValidationRecord {
            test: "CTA color".to_string(),
            passed: status == OverallStatus::Passed,
            expected: "green".into(),
            actual: if status == OverallStatus::Passed { "green".into() } else { "red".into() },
        }],
        overall_status: status,
        ..Default::default()
    }
}

#[test]
fn test_prompt_framing_follows_test_result() {
    let passed = build_qa_prompt("make it green", &code(), Some(&result(OverallStatus::Passed)));
    assert!(passed.contains("raise your confidence"));

    let failed = build_qa_prompt("make it green", &code(), Some(&result(OverallStatus::Failed)));
    assert!(failed.contains("Lower your confidence"));
    assert!(failed.contains("- failed: CTA color"));

    let absent = build_qa_prompt("make it green", &code(), None);
    assert!(absent.contains("do not adjust your confidence"));
    assert!(absent.contains("\"correctnessScore\""));
}

#[test]
fn test_parse_structured_verdict_from_fence() {
    let text = "Here is my assessment:\n```json\n{\"passed\": false, \"changesDetected\": true, \"correctnessScore\": 45.6, \"issues\": [\"text unchanged\"], \"message\": \"Color ok, text wrong\", \"recommendations\": [\"set textContent\"]}\n```";
    let verdict = parse_verdict(text);
    assert!(verdict.structured);
    assert!(!verdict.passed);
    assert!(verdict.changes_detected);
    assert_eq!(verdict.correctness_score, 46);
    assert_eq!(verdict.issues, vec!["text unchanged"]);
}

#[test]
fn test_parse_clamps_score() {
    let verdict = parse_verdict(r#"{"passed": true, "correctnessScore": 140}"#);
    assert_eq!(verdict.correctness_score, 100);
}

#[test]
fn test_parse_accepts_quoted_score_and_flags() {
    let verdict = parse_verdict(
        r#"{"passed": "true", "changesDetected": "yes", "correctnessScore": "85", "message": "ok"}"#,
    );
    assert!(verdict.structured);
    assert!(verdict.passed);
    assert!(verdict.changes_detected);
    assert_eq!(verdict.correctness_score, 85);

    let verdict = parse_verdict(r#"{"passed": "False", "correctnessScore": "42.6%"}"#);
    assert!(!verdict.passed);
    assert_eq!(verdict.correctness_score, 43);
}

#[test]
fn test_prose_fallback() {
    let verdict = parse_verdict("The button looks green now and the text changed.");
    assert!(!verdict.structured);
    assert!(!verdict.passed);
    assert_eq!(verdict.message, "The button looks green now and the text changed.");
    assert!(feedback_for_adjustment(&verdict).is_none());
}

#[test]
fn test_feedback_for_failed_verdict() {
    let verdict = QaVerdict {
        passed: false,
        changes_detected: true,
        correctness_score: 40,
        issues: vec!["CTA text unchanged".to_string()],
        message: "Only the color changed".to_string(),
        recommendations: vec!["Set the CTA text".to_string()],
        structured: true,
    };
    let feedback = feedback_for_adjustment(&verdict).unwrap();
    assert!(feedback.starts_with(AUTOMATED_FEEDBACK_MARKER));
    assert!(feedback.contains("- Issue: CTA text unchanged"));
    assert!(feedback.contains("- Fix: Set the CTA text"));

    let clean = QaVerdict {
        passed: true,
        issues: Vec::new(),
        ..verdict
    };
    assert!(feedback_for_adjustment(&clean).is_none());
}

#[tokio::test]
async fn test_evaluate_sends_both_images() {
    let provider = ScriptedProvider::new(&[r#"{"passed": true, "changesDetected": true, "correctnessScore": 90, "message": "Looks right"}"#]);
    let evaluator = VisualQaEvaluator::new(gateway(&provider));

    let verdict = evaluator
        .evaluate(
            "data:image/png;base64,BEFORE",
            "data:image/png;base64,AFTER",
            "make it green",
            &code(),
            None,
            &settings(),
        )
        .await
        .unwrap();
    assert!(verdict.passed);
    assert_eq!(verdict.correctness_score, 90);

    let requests = provider.requests.lock();
    match &requests[0].messages[0].content {
        MessageContent::Parts(parts) => {
            let images = parts.iter().filter(|p| matches!(p, ContentPart::Image { .. })).count();
            assert_eq!(images, 2);
        }
        other => panic!("expected parts, got {:?}", other),
    }
    assert_eq!(requests[0].system.as_deref(), Some(QA_SYSTEM_PROMPT));
}
