//! Fetch supersession guard.
//!
//! Remote fetches are not cancellable, so a superseding fetch can race a
//! slower in-flight one — and without a guard, whichever resolves last
//! silently wins. Each screen holds a `FetchSequence`; every fetch takes a
//! ticket before sending, and only the response still holding the latest
//! ticket may be applied. Last user intent wins deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic per-screen fetch counter.
#[derive(Debug, Default)]
pub struct FetchSequence {
    latest: AtomicU64,
}

/// A ticket identifying one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a fetch about to start. Issuing supersedes every
    /// earlier ticket immediately, even before the new fetch resolves.
    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response holding this ticket may still be applied.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_is_current() {
        let seq = FetchSequence::new();
        let t = seq.issue();
        assert!(seq.is_current(t));
    }

    #[test]
    fn superseded_ticket_is_rejected() {
        let seq = FetchSequence::new();
        let first = seq.issue();
        let second = seq.issue();
        // The slow first fetch resolves after the second was issued.
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn reissue_supersedes_even_unresolved_fetches() {
        let seq = FetchSequence::new();
        let a = seq.issue();
        let b = seq.issue();
        let c = seq.issue();
        assert!(!seq.is_current(a));
        assert!(!seq.is_current(b));
        assert!(seq.is_current(c));
    }
}
