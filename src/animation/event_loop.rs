//! Virtual-time event loop
//!
//! A single-threaded queue of delayed events on a millisecond clock. Events
//! fire in due-time order; events due at the same instant fire in the order
//! they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Scheduled<E> {
    due_ms: u64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    // Reversed so the max-heap pops the earliest event first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct EventLoop<E> {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Default for EventLoop<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventLoop<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Queue `event` to fire `delay_ms` after the current instant.
    pub fn schedule_in(&mut self, delay_ms: u64, event: E) {
        let due_ms = self.now_ms + delay_ms;
        self.queue.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Pop the next event due at or before `until_ms`, moving the clock to its due time.
    pub fn next_due(&mut self, until_ms: u64) -> Option<E> {
        if self.queue.peek()?.due_ms > until_ms {
            return None;
        }
        let scheduled = self.queue.pop()?;
        self.now_ms = self.now_ms.max(scheduled.due_ms);
        Some(scheduled.event)
    }

    /// Move the clock forward once no more events are due.
    pub fn settle_at(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fires_by_due_time_then_scheduling_order() {
        let mut ev = EventLoop::new();
        ev.schedule_in(500, "b");
        ev.schedule_in(0, "a");
        ev.schedule_in(500, "c");
        ev.schedule_in(1000, "d");

        let mut fired = Vec::new();
        while let Some(e) = ev.next_due(500) {
            fired.push((e, ev.now()));
        }
        assert_eq!(fired, vec![("a", 0), ("b", 500), ("c", 500)]);
        assert_eq!(ev.pending(), 1);

        ev.settle_at(700);
        assert_eq!(ev.now(), 700);
        assert!(ev.next_due(999).is_none());
        assert_eq!(ev.next_due(1000), Some("d"));
        assert!(ev.is_idle());
    }

    #[test]
    fn delays_are_relative_to_the_current_instant() {
        let mut ev = EventLoop::new();
        ev.settle_at(200);
        ev.schedule_in(100, 1);
        assert!(ev.next_due(299).is_none());
        assert_eq!(ev.next_due(300), Some(1));
        assert_eq!(ev.now(), 300);
    }
}
