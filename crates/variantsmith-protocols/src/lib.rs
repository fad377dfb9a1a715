//! # Variantsmith Protocols
//!
//! Core definitions shared by every stage of the variation pipeline.
//! Contains only data types, interface traits and error types - no
//! pipeline logic.
//!
//! ## Core Traits
//!
//! - [`LLMProvider`] - Trait for LLM provider implementations
//! - [`PageCapture`] - External page capture/extraction service
//! - [`PageSandbox`] - External in-page execution sandbox
//!
//! ## Data Model
//!
//! - [`ElementDatabase`] / [`ElementRecord`] - captured page elements
//! - [`GeneratedCode`] / [`Variation`] - parsed model output
//! - [`ConversationTurn`] - one entry of a session's audit trail
//! - [`TestExecutionResult`] - outcome of one in-page test run

pub mod code;
pub mod collaborators;
pub mod conversation;
pub mod error;
pub mod page;
pub mod provider;
pub mod qa;
pub mod testing;
pub mod types;

pub use code::{CodeKind, CodeLocation, CodePayload, GeneratedCode, Variation};
pub use collaborators::{CapturedPage, PageCapture, PageSandbox};
pub use conversation::ConversationTurn;
pub use error::{HarnessError, PipelineError, ProviderError, ProviderFailureKind, SandboxError};
pub use page::{
    DatabaseMetadata, ElementDatabase, ElementLevel, ElementRecord, ExtractionMode,
    GenerationRequest, GenerationSettings, PageData, SelectedElement, VariationSpec, VisualInfo,
};
pub use provider::{
    CompletionRequest, CompletionResponse, LLMProvider, ModelDefinition, ProviderCapabilities,
    ProviderKind, ProviderSettings,
};
pub use qa::QaVerdict;
pub use testing::{
    InteractionRecord, OverallStatus, TestExecutionResult, TestFailureKind, TestRunReport,
    ValidationRecord,
};
pub use types::*;
