use std::collections::HashMap;

/// Logical location for "the most recent in-flight request of a given kind".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    DesignList,
    DesignDetail,
}

/// Stamp handed out when a read starts. Its response may only be applied
/// while it is still the latest ticket for its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestSlots {
    next_seq: u64,
    latest: HashMap<Slot, u64>,
}

impl RequestSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request in `slot`, superseding whatever was outstanding there.
    pub fn begin(&mut self, slot: Slot) -> Ticket {
        self.next_seq += 1;
        self.latest.insert(slot, self.next_seq);
        Ticket {
            slot,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.seq)
    }

    /// Make every outstanding ticket for `slot` stale without starting a new request.
    pub fn invalidate(&mut self, slot: Slot) {
        self.next_seq += 1;
        self.latest.insert(slot, self.next_seq);
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate(Slot::DesignList);
        self.invalidate(Slot::DesignDetail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut slots = RequestSlots::new();
        let first = slots.begin(Slot::DesignDetail);
        let second = slots.begin(Slot::DesignDetail);

        assert!(!slots.is_current(&first));
        assert!(slots.is_current(&second));
    }

    #[test]
    fn slots_are_independent() {
        let mut slots = RequestSlots::new();
        let list = slots.begin(Slot::DesignList);
        let detail = slots.begin(Slot::DesignDetail);

        assert!(slots.is_current(&list));
        assert!(slots.is_current(&detail));

        slots.invalidate(Slot::DesignDetail);
        assert!(slots.is_current(&list));
        assert!(!slots.is_current(&detail));
    }

    #[test]
    fn sequence_numbers_increase_monotonically() {
        let mut slots = RequestSlots::new();
        let a = slots.begin(Slot::DesignList);
        slots.invalidate_all();
        let b = slots.begin(Slot::DesignList);
        assert!(b.seq > a.seq);
    }
}
