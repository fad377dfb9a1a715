//! Test Harness Builder & Execution.

mod classify;
mod library;
mod runner;

pub use classify::{classify_message, classify_sandbox_error};
pub use library::{ENTRY_POINT, INTERACTION_LIBRARY, TestHarnessBuilder};
pub use runner::{RetryPolicy, TestRunner};
