use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use combat_core::{DeferredCast, Tick};

/// A deferred cast waiting in the queue.
#[derive(Clone, Copy, Debug)]
struct Pending {
    seq: u64,
    cast: DeferredCast,
}

impl Pending {
    fn key(&self) -> (Tick, u64) {
        (self.cast.fire_at, self.seq)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of deferred casts ordered by due tick, then submission order.
///
/// Every item is handed out exactly once.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cast: DeferredCast) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending { seq, cast }));
    }

    /// Removes and returns every cast due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Tick) -> Vec<DeferredCast> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.cast.fire_at > now {
                break;
            }
            if let Some(Reverse(pending)) = self.heap.pop() {
                due.push(pending.cast);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CombatContext, EntityId, SkillId, Target};

    fn cast(skill: u16, fire_at: u64) -> DeferredCast {
        DeferredCast {
            skill: SkillId(skill),
            context: CombatContext::new(EntityId(1), Target::Entity(EntityId(2)), 1, Tick(0)),
            fire_at: Tick(fire_at),
        }
    }

    #[test]
    fn due_items_come_out_by_tick_then_submission() {
        let mut queue = TimerQueue::new();
        queue.push(cast(3, 4));
        queue.push(cast(1, 2));
        queue.push(cast(2, 2));
        queue.push(cast(4, 9));

        let due: Vec<u16> = queue.take_due(Tick(4)).iter().map(|c| c.skill.0).collect();
        assert_eq!(due, vec![1, 2, 3]);
        assert_eq!(queue.len(), 1);

        // At most once.
        assert!(queue.take_due(Tick(4)).is_empty());
        assert_eq!(queue.take_due(Tick(9)).len(), 1);
        assert!(queue.is_empty());
    }
}
