use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use variantsmith_config::HarnessConfig;
use variantsmith_protocols::{
    HarnessError, PageSandbox, TestExecutionResult, TestFailureKind, TestRunReport,
};

use super::classify::{classify_message, classify_sandbox_error};
use super::library::TestHarnessBuilder;

/// Timeout and retry discipline for test execution.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub default_timeout: Duration,
    /// Hard ceiling; no attempt runs longer.
    pub max_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff_multiplier: f64,
    pub settle_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HarnessConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            default_timeout: Duration::from_millis(config.default_timeout_ms),
            max_timeout: Duration::from_millis(config.max_timeout_ms),
            max_retries: config.max_retries,
            backoff_multiplier: config.backoff_multiplier,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }

    /// Timeout of the first attempt, clamped to the ceiling.
    pub fn initial_timeout(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.default_timeout).min(self.max_timeout)
    }

    /// Timeout for attempt `attempt` (0-based).
    pub fn timeout_for_attempt(&self, initial: Duration, attempt: u32) -> Duration {
        let scaled = initial.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(scaled.round() as u64).min(self.max_timeout)
    }
}

/// Runs assembled test scripts in the page sandbox.
pub struct TestRunner {
    sandbox: Arc<dyn PageSandbox>,
    policy: RetryPolicy,
}

impl TestRunner {
    pub fn new(sandbox: Arc<dyn PageSandbox>, policy: RetryPolicy) -> Self {
        Self { sandbox, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Assemble `test_source` and run it against `target`.
    ///
    /// Completed runs (passed or failed) return immediately. Crashes,
    /// timeouts and missing results are retried with a growing timeout.
    pub async fn run(
        &self,
        target: &str,
        test_source: &str,
        timeout: Option<Duration>,
    ) -> Result<TestRunReport, HarnessError> {
        let script = TestHarnessBuilder::build(test_source);
        let initial = self.policy.initial_timeout(timeout);
        let max_attempts = self.policy.max_retries + 1;
        let mut failure = (TestFailureKind::Unknown, String::new());
        let mut used = initial;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                tokio::time::sleep(self.policy.settle_delay).await;
            }
            used = self.policy.timeout_for_attempt(initial, attempt);
            debug!(page = %target, attempt = attempt + 1, timeout_ms = used.as_millis() as u64, "Running test script");

            let outcome =
                tokio::time::timeout(used, self.sandbox.execute_script(target, &script, used)).await;
            failure = match outcome {
                Err(_) => (
                    TestFailureKind::Timeout,
                    format!("no result within {} ms", used.as_millis()),
                ),
                Ok(Err(err)) => (classify_sandbox_error(&err), err.to_string()),
                Ok(Ok(None)) => (
                    TestFailureKind::NoResults,
                    "the script returned no result".to_string(),
                ),
                Ok(Ok(Some(value))) => match serde_json::from_value::<TestExecutionResult>(value) {
                    Ok(result) if result.completed() => {
                        let report = TestRunReport {
                            result,
                            attempts: attempt + 1,
                            timeout_ms: used.as_millis() as u64,
                        };
                        info!(
                            page = %target,
                            attempts = report.attempts,
                            status = ?report.result.overall_status,
                            "Test run completed"
                        );
                        return Ok(report);
                    }
                    Ok(result) => {
                        let message = result.error.unwrap_or_else(|| "the test reported an error".to_string());
                        (classify_message(&message), message)
                    }
                    Err(err) => (
                        TestFailureKind::NoResults,
                        format!("malformed result payload: {}", err),
                    ),
                },
            };
            warn!(
                page = %target,
                attempt = attempt + 1,
                max_attempts,
                kind = %failure.0,
                "Test execution failed: {}",
                failure.1
            );
        }

        Err(HarnessError {
            kind: failure.0,
            attempts: max_attempts,
            last_timeout_ms: used.as_millis() as u64,
            message: failure.1,
        })
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
