//! Completion response types.

use serde::{Deserialize, Serialize};

use crate::types::{Message, Metadata, StopReason, Usage};

/// Response from a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Unique ID for this completion.
    pub id: String,

    /// Model used.
    pub model: String,

    /// The assistant's response message.
    pub message: Message,

    /// Reason for stopping.
    pub stop_reason: StopReason,

    /// Token usage.
    pub usage: Usage,

    /// Additional metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl CompletionResponse {
    /// Text content of the assistant message.
    pub fn text(&self) -> String {
        self.message.content.text()
    }
}
