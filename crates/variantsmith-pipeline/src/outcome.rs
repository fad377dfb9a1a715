use serde::{Deserialize, Serialize};
use tracing::warn;
use variantsmith_protocols::{ElementDatabase, GeneratedCode, Usage};

use crate::adjust::MergeViolation;
use crate::gateway::ModelReply;
use crate::parser::{ParseStrategy, ResponseParser};
use crate::selectors::{self, SelectorRepair, SelectorWarning};

/// Everything one generation or adjustment turn produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub code: GeneratedCode,

    /// `None` when no parse strategy matched.
    pub strategy: Option<ParseStrategy>,

    /// Selectors that remain unknown after repair.
    pub warnings: Vec<SelectorWarning>,

    pub repairs: Vec<SelectorRepair>,

    pub violations: Vec<MergeViolation>,

    pub usage: Usage,

    pub model: String,
}

impl GenerationOutcome {
    /// Parse a model reply and validate/repair it against `database`.
    pub fn from_reply(reply: &ModelReply, database: &ElementDatabase) -> Self {
        let parsed = ResponseParser::parse(&reply.content);
        let mut code = parsed.code;
        let report = if parsed.strategy.is_some() {
            selectors::repair(&mut code, database)
        } else {
            warn!(model = %reply.model, "Model reply produced no variations");
            Default::default()
        };

        Self {
            code,
            strategy: parsed.strategy,
            warnings: report.unrepairable,
            repairs: report.repairs,
            violations: Vec::new(),
            usage: reply.usage,
            model: reply.model.clone(),
        }
    }

    /// No variations were recovered from the reply.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
