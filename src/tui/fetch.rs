//! Generation tickets for in-flight fetches
//!
//! Every fetch takes a ticket from a [`FetchTracker`]. Issuing a new ticket
//! makes all older ones stale, so a slow response for a previous selection is
//! recognised and dropped instead of overwriting newer data. Requests are
//! never cancelled; only their results are ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a fetch was started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues tickets for one kind of fetch
#[derive(Debug, Clone, Default)]
pub struct FetchTracker {
    latest: Arc<AtomicU64>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding every earlier ticket
    pub fn begin(&self) -> FetchTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        FetchTicket { generation }
    }

    /// Supersede outstanding tickets without starting a fetch
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.generation
    }

    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Return to an earlier generation. Only valid when no ticket issued
    /// since then has reached a fetch.
    pub fn rewind(&self, generation: u64) {
        self.latest.store(generation, Ordering::Release);
    }
}
