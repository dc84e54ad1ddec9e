// Request generations.
// Every load is stamped with a ticket; a view accepts only the outcome of its latest one.

/// Identifies one background load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
}

/// Monotonic source of tickets, shared by all views so a ticket is never reused
/// after navigating away and back.
#[derive(Debug, Default)]
pub struct RequestIds {
    next: u64,
}

impl RequestIds {
    pub fn issue(&mut self) -> Ticket {
        self.next += 1;
        Ticket {
            generation: self.next,
        }
    }
}

/// The in-flight load a view is currently waiting on, if any.
#[derive(Debug, Default)]
pub struct RequestSlot {
    pending: Option<u64>,
}

impl RequestSlot {
    /// Start a new load, superseding whatever was pending.
    pub fn begin(&mut self, ids: &mut RequestIds) -> Ticket {
        let ticket = ids.issue();
        self.pending = Some(ticket.generation);
        ticket
    }

    /// Accept an outcome. Returns false for superseded or cancelled tickets.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.pending == Some(ticket.generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_settles() {
        let mut ids = RequestIds::default();
        let mut slot = RequestSlot::default();

        let first = slot.begin(&mut ids);
        let second = slot.begin(&mut ids);

        assert!(!slot.settle(first));
        assert!(slot.settle(second));
        assert!(!slot.settle(second));
    }

    #[test]
    fn test_cancelled_ticket_is_ignored() {
        let mut ids = RequestIds::default();
        let mut slot = RequestSlot::default();

        let ticket = slot.begin(&mut ids);
        slot.cancel();
        assert!(!slot.settle(ticket));
    }

    #[test]
    fn test_tickets_unique_across_slots() {
        let mut ids = RequestIds::default();
        let mut posts = RequestSlot::default();
        let mut fresh_posts = RequestSlot::default();

        let old = posts.begin(&mut ids);
        // A rebuilt view gets a new slot but never sees the old generation again
        let new = fresh_posts.begin(&mut ids);
        assert_ne!(old, new);
        assert!(!fresh_posts.settle(old));
    }
}
