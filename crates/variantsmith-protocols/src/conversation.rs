//! Session audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::code::GeneratedCode;

/// One request/response pair of a working session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub request: String,
    pub code: GeneratedCode,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(request: impl Into<String>, code: GeneratedCode) -> Self {
        Self {
            request: request.into(),
            code,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_new() {
        let turn = ConversationTurn::new("make it green", GeneratedCode::default());
        assert_eq!(turn.request, "make it green");
        assert!(turn.code.is_empty());
        assert!(turn.created_at <= Utc::now());
    }
}
