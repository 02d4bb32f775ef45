//! "Latest request wins" bookkeeping.
//!
//! Requests are never cancelled. Each one takes a ticket, and a response is
//! applied only when no newer ticket has been applied before it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
    pending: usize,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket and mark a request as in flight.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.pending += 1;
        Ticket(self.issued)
    }

    /// Close the request behind `ticket`. Returns `true` when its response
    /// should be applied, `false` when a newer one already was.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        self.pending = self.pending.saturating_sub(1);
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> bool {
        self.pending > 0
    }

    pub fn last_applied(&self) -> u64 {
        self.applied
    }
}
