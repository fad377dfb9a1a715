//! Terminal test-execution failure.

use thiserror::Error;

use crate::testing::TestFailureKind;

#[derive(Debug, Clone, Error)]
#[error("Test execution failed ({kind}) after {attempts} attempt(s), last timeout {last_timeout_ms} ms: {message}")]
pub struct HarnessError {
    pub kind: TestFailureKind,
    pub attempts: u32,
    pub last_timeout_ms: u64,
    pub message: String,
}

impl HarnessError {
    /// User-facing recovery message chosen by failure class.
    pub fn recovery_message(&self) -> String {
        let advice = match self.kind {
            TestFailureKind::Timeout => {
                "The test did not finish in time; the page may still be loading or the test waits for an element that never appears."
            }
            TestFailureKind::SelectorNotFound => {
                "A selector used by the test is not on the page; regenerate the test against the current element database."
            }
            TestFailureKind::NoResults => {
                "The test ran but returned no results; make sure the test function records validations."
            }
            TestFailureKind::JavascriptError => {
                "The test script threw a JavaScript error; check the generated test code."
            }
            TestFailureKind::TabError => {
                "The browser tab could not be reached; reload the page and run the test again."
            }
            TestFailureKind::Unknown => "The test failed for an unknown reason; see the log for details.",
        };
        format!("{} ({} attempt(s))", advice, self.attempts)
    }
}
