use std::fmt::Write;

use tracing::{debug, info};
use variantsmith_protocols::{GeneratedCode, GenerationRequest, ProviderError, ProviderSettings};

use super::log::ConversationLog;
use super::merge::{check_additive, enforce_additive};
use crate::feedback::is_automated;
use crate::gateway::ProviderGateway;
use crate::outcome::GenerationOutcome;
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};

pub struct AdjustmentEngine {
    gateway: ProviderGateway,
    builder: PromptBuilder,
    enforce_additive: bool,
}

impl AdjustmentEngine {
    pub fn new(gateway: ProviderGateway, enforce_additive: bool) -> Self {
        Self {
            gateway,
            builder: PromptBuilder::new(),
            enforce_additive,
        }
    }

    /// Conversation context for an adjustment turn.
    ///
    /// Automated feedback and test summaries become mandatory fixes; human
    /// feedback stays in the request section of the prompt.
    pub fn build_context(
        previous: &GeneratedCode,
        feedback: &str,
        test_summary: Option<&str>,
        history: Option<&ConversationLog>,
    ) -> String {
        let mut context = String::new();

        let code = serde_json::to_string_pretty(previous).unwrap_or_default();
        let _ = writeln!(
            context,
            "## ALREADY APPLIED CODE\nThe code below is ALREADY LIVE on the page. It is the base of your answer.\n```json\n{}\n```\n",
            code
        );

        context.push_str(
            "## MERGE RULE\n\
             Your output = existing code + new changes.\n\
             - Return the COMPLETE code: every existing rule, statement and variation, plus the changes.\n\
             - NEVER delete existing code. To undo an existing style, add a rule that overrides it.\n\
             - NEVER return only the new changes; NEVER replace the existing code.\n\n",
        );

        let mut mandatory = Vec::new();
        if is_automated(feedback) {
            mandatory.push(feedback.trim());
        }
        if let Some(summary) = test_summary.map(str::trim).filter(|s| !s.is_empty()) {
            mandatory.push(summary);
        }
        if !mandatory.is_empty() {
            context.push_str(
                "## MANDATORY FIXES\nThe following comes from automated QA of the applied code. \
                 Every item MUST be fixed in this response; these are requirements, not suggestions.\n",
            );
            for item in mandatory {
                let _ = writeln!(context, "{}\n", item);
            }
        }

        if let Some(history) = history.filter(|h| !h.is_empty()) {
            let _ = writeln!(context, "## CONVERSATION HISTORY\n{}", history.summary());
        }
        context
    }

    /// Run one adjustment turn.
    ///
    /// `request.description` carries the feedback. Without previous code the
    /// turn is a plain initial generation.
    pub async fn adjust(
        &self,
        request: &GenerationRequest,
        previous: Option<&GeneratedCode>,
        test_summary: Option<&str>,
        history: Option<&ConversationLog>,
        settings: &ProviderSettings,
    ) -> Result<GenerationOutcome, ProviderError> {
        let previous = previous.filter(|code| !code.is_empty());
        let context = previous
            .map(|code| Self::build_context(code, &request.description, test_summary, history));
        debug!(
            first_turn = previous.is_none(),
            automated = is_automated(&request.description),
            "Building adjustment prompt"
        );

        let messages = self.builder.messages(request, context.as_deref());
        let reply = self.gateway.call_model(SYSTEM_PROMPT, messages, settings).await?;
        let mut outcome = GenerationOutcome::from_reply(&reply, &request.page_data.database);

        if let Some(previous) = previous {
            if !outcome.is_empty() {
                outcome.violations = if self.enforce_additive {
                    enforce_additive(previous, &mut outcome.code)
                } else {
                    check_additive(previous, &outcome.code)
                };
            }
        }

        info!(
            variations = outcome.code.variations.len(),
            violations = outcome.violations.len(),
            "Adjustment turn completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
