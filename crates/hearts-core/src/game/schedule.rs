//! Virtual-time task queue used to pace trick collection and automated moves.
//!
//! Every task is tagged with the deal it was scheduled for. Callers compare that tag
//! with the engine's current deal before acting, so a task outliving its deal is a no-op.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled<T> {
    pub due: Duration,
    pub deal_id: u64,
    pub task: T,
}

#[derive(Debug)]
struct Entry<T> {
    seq: u64,
    item: Scheduled<T>,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item
            .due
            .cmp(&other.item.due)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Queues `task` to fire `delay` after the current clock. Returns its due time.
    pub fn schedule(&mut self, delay: Duration, deal_id: u64, task: T) -> Duration {
        let due = self.now + delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            seq,
            item: Scheduled { due, deal_id, task },
        }));
        due
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Moves the clock forward to the earliest pending task, if any.
    pub fn advance_to_next(&mut self) -> bool {
        match self.until_next() {
            Some(wait) => {
                self.advance(wait);
                true
            }
            None => false,
        }
    }

    /// Removes the earliest task whose due time has passed.
    pub fn pop_due(&mut self) -> Option<Scheduled<T>> {
        let ready = self
            .queue
            .peek()
            .is_some_and(|Reverse(entry)| entry.item.due <= self.now);
        if ready {
            self.queue.pop().map(|Reverse(entry)| entry.item)
        } else {
            None
        }
    }

    pub fn until_next(&self) -> Option<Duration> {
        self.queue
            .peek()
            .map(|Reverse(entry)| entry.item.due.saturating_sub(self.now))
    }

    /// Drops every task not tagged with `deal_id`. Returns how many were dropped.
    pub fn discard_stale(&mut self, deal_id: u64) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(entry)| entry.item.deal_id == deal_id);
        before - self.queue.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use std::time::Duration;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tasks_fire_in_due_order_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(500), 1, "late");
        scheduler.schedule(ms(100), 1, "first");
        scheduler.schedule(ms(100), 1, "second");

        assert_eq!(scheduler.pop_due(), None);
        assert_eq!(scheduler.until_next(), Some(ms(100)));

        scheduler.advance(ms(100));
        assert_eq!(scheduler.pop_due().map(|s| s.task), Some("first"));
        assert_eq!(scheduler.pop_due().map(|s| s.task), Some("second"));
        assert_eq!(scheduler.pop_due(), None);

        assert!(scheduler.advance_to_next());
        assert_eq!(scheduler.now(), ms(500));
        assert_eq!(scheduler.pop_due().map(|s| s.task), Some("late"));
        assert!(!scheduler.advance_to_next());
    }

    #[test]
    fn discard_stale_keeps_current_deal_only() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(10), 1, 'a');
        scheduler.schedule(ms(20), 2, 'b');
        scheduler.schedule(ms(30), 1, 'c');

        assert_eq!(scheduler.discard_stale(2), 2);
        assert_eq!(scheduler.len(), 1);
        scheduler.advance(ms(30));
        let fired = scheduler.pop_due().unwrap();
        assert_eq!((fired.deal_id, fired.task), (2, 'b'));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn zero_delay_is_due_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler.advance(ms(250));
        let due = scheduler.schedule(Duration::ZERO, 4, ());
        assert_eq!(due, ms(250));
        assert!(scheduler.pop_due().is_some());
    }
}
