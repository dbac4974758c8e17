//! Monotonic tickets used to drop responses that were superseded while in
//! flight.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidates every ticket issued so far.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut sequence = RequestSequence::default();
        let first = sequence.next();
        assert!(sequence.is_current(first));

        let second = sequence.next();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn invalidate_retires_outstanding_tickets() {
        let mut sequence = RequestSequence::default();
        let ticket = sequence.next();
        sequence.invalidate();
        assert!(!sequence.is_current(ticket));
        let next = sequence.next();
        assert!(sequence.is_current(next));
    }
}
