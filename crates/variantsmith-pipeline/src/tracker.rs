//! Request supersession.
//!
//! Each capture or generation for a target takes a ticket; only the most
//! recent ticket for a target may publish its result. Older in-flight work
//! is not aborted, its result is discarded.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;
use variantsmith_protocols::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub target: String,
    pub id: u64,
}

#[derive(Default)]
pub struct RequestTracker {
    current: DashMap<String, u64>,
    next: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `target`, superseding any earlier one.
    pub fn begin(&self, target: &str) -> RequestTicket {
        let id = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.current.insert(target.to_string(), id) {
            debug!(page = %target, previous, id, "Superseding in-flight request");
        }
        RequestTicket {
            target: target.to_string(),
            id,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.current
            .get(&ticket.target)
            .is_some_and(|id| *id == ticket.id)
    }

    pub fn ensure_current(&self, ticket: &RequestTicket) -> Result<(), PipelineError> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            debug!(page = %ticket.target, id = ticket.id, "Discarding superseded result");
            Err(PipelineError::Superseded {
                target: ticket.target.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let tracker = RequestTracker::new();
        let first = tracker.begin("https://a.test");
        let second = tracker.begin("https://a.test");
        assert!(second.id > first.id);
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(matches!(
            tracker.ensure_current(&first),
            Err(PipelineError::Superseded { .. })
        ));
        assert!(tracker.ensure_current(&second).is_ok());
    }

    #[test]
    fn test_targets_are_independent() {
        let tracker = RequestTracker::new();
        let a = tracker.begin("https://a.test");
        let _b = tracker.begin("https://b.test");
        assert!(tracker.is_current(&a));
    }
}
