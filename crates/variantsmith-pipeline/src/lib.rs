//! # Variantsmith Pipeline
//!
//! Turns a captured element database and a natural-language request into
//! validated, injectable CSS/JS variations.
//!
//! ## Stages
//!
//! - [`prompt`] - selector-whitelisted prompt construction
//! - [`gateway`] - uniform model calls over heterogeneous providers
//! - [`parser`] - five-strategy response recovery
//! - [`selectors`] - selector validation and conservative repair
//! - [`harness`] - in-page test script assembly and bounded-retry execution
//! - [`adjust`] - additive iterative adjustment
//! - [`qa`] - before/after visual judgement
//!
//! [`GenerationSession`] wires the stages together for one target page.

pub mod adjust;
pub mod cache;
pub mod feedback;
pub mod gateway;
pub mod harness;
pub mod outcome;
pub mod page;
pub mod parser;
pub mod prompt;
pub mod qa;
pub mod selectors;
pub mod session;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use adjust::{AdjustmentEngine, ConversationLog, MergeViolation};
pub use cache::{CachedPage, ElementDatabaseCache};
pub use feedback::{AUTOMATED_FEEDBACK_MARKER, is_automated, summarize_test_result};
pub use gateway::{ModelReply, ProviderFactory, ProviderGateway};
pub use harness::{RetryPolicy, TestHarnessBuilder, TestRunner};
pub use outcome::GenerationOutcome;
pub use page::PageOperations;
pub use parser::{ParseStrategy, ParsedResponse, ResponseParser};
pub use prompt::PromptBuilder;
pub use qa::VisualQaEvaluator;
pub use selectors::{RepairReport, SelectorRepair, SelectorWarning};
pub use session::{GenerationSession, PipelineContext};
pub use tracker::{RequestTicket, RequestTracker};
