//! Monotonic request fencing.
//!
//! Every keystroke can start a new `/simulate` cycle and in-flight requests
//! are never cancelled, so a slow early response can arrive after a newer
//! one. The fence gives every request a monotonically increasing ticket and
//! only lets the response holding the latest ticket through.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTicket(u64);

impl UpdateTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides which responses may be applied.
#[derive(Debug, Default)]
pub struct UpdateFence {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl UpdateFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the ticket for a request that is about to be sent.
    pub fn begin(&self) -> UpdateTicket {
        UpdateTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Try to commit a completed request. Returns true when its response may
    /// be applied: the ticket is still the latest issued one and newer than
    /// anything already applied.
    pub fn try_commit(&self, ticket: UpdateTicket) -> bool {
        if ticket.0 != self.issued.load(Ordering::SeqCst) {
            return false;
        }
        let mut applied = self.applied.load(Ordering::SeqCst);
        loop {
            if ticket.0 <= applied {
                return false;
            }
            match self.applied.compare_exchange(
                applied,
                ticket.0,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(current) => applied = current,
            }
        }
    }
}
