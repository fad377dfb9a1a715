use super::*;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use variantsmith_protocols::{CodePayload, OverallStatus, SandboxError};

enum Step {
    Hang,
    Value(serde_json::Value),
    Nothing,
    Fail(SandboxError),
}

struct ScriptedSandbox {
    steps: Mutex<VecDeque<Step>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl ScriptedSandbox {
    fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            timeouts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PageSandbox for ScriptedSandbox {
    async fn execute_script(
        &self,
        _target: &str,
        script: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, SandboxError> {
        assert!(script.contains("runTest"));
        self.timeouts.lock().push(timeout);
        let step = self.steps.lock().pop_front().unwrap_or(Step::Nothing);
        match step {
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
            Step::Value(value) => Ok(Some(value)),
            Step::Nothing => Ok(None),
            Step::Fail(err) => Err(err),
        }
    }

    async fn apply_code(&self, _target: &str, _payload: &CodePayload) -> Result<(), SandboxError> {
        Ok(())
    }
}

fn passed() -> serde_json::Value {
    json!({
        "interactions": [{"type": "click", "target": "#cta", "success": true}],
        "validations": [{"test": "CTA text", "passed": true, "expected": "Start Free Trial", "actual": "Start Free Trial"}],
        "overallStatus": "passed"
    })
}

const SOURCE: &str = "async function runTest() { validate('ok', true); }";

#[test]
fn test_policy_defaults() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.default_timeout, Duration::from_secs(10));
    assert_eq!(policy.max_timeout, Duration::from_secs(20));
    assert_eq!(policy.max_retries, 2);
}

#[test]
fn test_timeout_growth_is_capped() {
    let policy = RetryPolicy::default();
    let initial = policy.initial_timeout(None);
    assert_eq!(policy.timeout_for_attempt(initial, 0), Duration::from_secs(10));
    assert_eq!(policy.timeout_for_attempt(initial, 1), Duration::from_secs(15));
    assert_eq!(policy.timeout_for_attempt(initial, 2), Duration::from_secs(20));
    assert_eq!(policy.initial_timeout(Some(Duration::from_secs(60))), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_then_success_reports_attempts_and_timeout() {
    let sandbox = ScriptedSandbox::new(vec![Step::Hang, Step::Value(passed())]);
    let runner = TestRunner::new(sandbox.clone(), RetryPolicy::default());

    let report = runner.run("https://example.com", SOURCE, None).await.unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.timeout_ms, 15_000);
    assert_eq!(report.result.overall_status, OverallStatus::Passed);
    assert_eq!(
        *sandbox.timeouts.lock(),
        vec![Duration::from_secs(10), Duration::from_secs(15)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_completed_failure_is_not_retried() {
    let failed = json!({
        "validations": [{"test": "color", "passed": false, "expected": "green", "actual": "red"}],
        "overallStatus": "failed"
    });
    let sandbox = ScriptedSandbox::new(vec![Step::Value(failed), Step::Value(passed())]);
    let runner = TestRunner::new(sandbox.clone(), RetryPolicy::default());

    let report = runner.run("t", SOURCE, None).await.unwrap();
    assert_eq!(report.attempts, 1);
    assert_eq!(report.result.overall_status, OverallStatus::Failed);
    assert_eq!(sandbox.timeouts.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_classify_last_failure() {
    let sandbox = ScriptedSandbox::new(vec![
        Step::Nothing,
        Step::Fail(SandboxError::ScriptError("TypeError: x is not a function".to_string())),
        Step::Value(json!({"overallStatus": "error", "error": "Element not found: #cta (waited 5000 ms)"})),
    ]);
    let runner = TestRunner::new(sandbox.clone(), RetryPolicy::default());

    let err = runner.run("t", SOURCE, Some(Duration::from_secs(4))).await.unwrap_err();
    assert_eq!(err.kind, TestFailureKind::SelectorNotFound);
    assert_eq!(err.attempts, 3);
    assert_eq!(err.last_timeout_ms, 9_000);
    assert!(err.recovery_message().contains("3 attempt"));
}

#[tokio::test(start_paused = true)]
async fn test_malformed_payload_is_no_results() {
    let policy = RetryPolicy {
        max_retries: 0,
        ..Default::default()
    };
    let sandbox = ScriptedSandbox::new(vec![Step::Value(json!("not an object"))]);
    let runner = TestRunner::new(sandbox, policy);

    let err = runner.run("t", SOURCE, None).await.unwrap_err();
    assert_eq!(err.kind, TestFailureKind::NoResults);
    assert_eq!(err.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_all_timeouts() {
    let sandbox = ScriptedSandbox::new(vec![Step::Hang, Step::Hang, Step::Hang]);
    let runner = TestRunner::new(sandbox, RetryPolicy::default());

    let err = runner.run("t", SOURCE, None).await.unwrap_err();
    assert_eq!(err.kind, TestFailureKind::Timeout);
    assert_eq!(err.last_timeout_ms, 20_000);
}
