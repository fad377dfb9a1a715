use std::collections::VecDeque;
use std::fmt::Write;

use variantsmith_protocols::ConversationTurn;

/// Append-only record of a session's turns, capped at `max_turns`.
///
/// When full, the oldest turn is dropped.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: VecDeque<ConversationTurn>,
    max_turns: usize,
}

impl ConversationLog {
    pub fn new(max_turns: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_turns.min(64)),
            max_turns,
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        if self.max_turns == 0 {
            return;
        }
        while self.turns.len() >= self.max_turns {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// One line per retained turn, oldest first.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (idx, turn) in self.turns.iter().enumerate() {
            let names: Vec<&str> = turn.code.variations.iter().map(|v| v.name.as_str()).collect();
            let _ = writeln!(
                out,
                "{}. \"{}\" -> {} variation(s){}",
                idx + 1,
                turn.request.trim(),
                names.len(),
                if names.is_empty() {
                    String::new()
                } else {
                    format!(": {}", names.join(", "))
                }
            );
        }
        out
    }
}
