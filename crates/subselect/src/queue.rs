//! Indexed max-priority queue with O(1) logical deletion.
//!
//! Used by the lazy optimizers to cache marginal gains between rounds.
//!
//! Entries live in an arena; the heap only stores `(negated priority,
//! sequence, slot)` keys ordered as a min-heap. A lookup table maps each live
//! item to its arena slot, so [`PriorityQueue::remove`] just flips the slot's
//! tombstone flag and forgets the item. [`PriorityQueue::pop`] discards
//! tombstoned roots until it reaches a live entry.
//!
//! Ties on equal priority pop in insertion order.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

/// Popped from a queue with no live entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("priority queue is empty")]
pub struct QueueEmpty;

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    priority: f64,
    tombstoned: bool,
}

/// Heap key. `neg_priority` is the negated priority so that the smallest key
/// belongs to the largest priority.
#[derive(Debug, Clone, Copy)]
struct HeapKey {
    neg_priority: f64,
    seq: u64,
    slot: usize,
}

impl PartialEq for HeapKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapKey {}

impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.neg_priority
            .total_cmp(&other.neg_priority)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Max-priority queue keyed by item, with lazy removal.
///
/// # Example
///
/// ```
/// use subselect::queue::PriorityQueue;
///
/// let mut pq = PriorityQueue::new();
/// pq.push(0usize, 1.5);
/// pq.push(1usize, 3.0);
/// pq.push(2usize, 2.0);
/// pq.remove(&1);
///
/// assert_eq!(pq.pop(), Ok((2.0, 2)));
/// assert_eq!(pq.pop(), Ok((1.5, 0)));
/// assert!(pq.pop().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Reverse<HeapKey>>,
    entries: Vec<Entry<T>>,
    lookup: HashMap<T, usize>,
    seq: u64,
}

impl<T: Copy + Eq + Hash> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty queue with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
            seq: 0,
        }
    }

    /// Number of live items.
    #[inline]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` if no live items remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Returns `true` if `item` is live in the queue.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.lookup.contains_key(item)
    }

    /// Current priority of a live item.
    pub fn priority_of(&self, item: &T) -> Option<f64> {
        self.lookup.get(item).map(|&slot| self.entries[slot].priority)
    }

    /// Insert `item` with `priority`, replacing any live entry for it.
    pub fn push(&mut self, item: T, priority: f64) {
        self.remove(&item);

        let slot = self.entries.len();
        self.entries.push(Entry {
            item,
            priority,
            tombstoned: false,
        });
        self.lookup.insert(item, slot);
        self.heap.push(Reverse(HeapKey {
            // `+ 0.0` folds -0.0 into 0.0 so zero gains tie by sequence.
            neg_priority: -priority + 0.0,
            seq: self.seq,
            slot,
        }));
        self.seq += 1;
    }

    /// Logically delete `item`. Returns `false` if it was not live.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.lookup.remove(item) {
            Some(slot) => {
                self.entries[slot].tombstoned = true;
                true
            }
            None => false,
        }
    }

    /// Remove and return the live entry with the highest priority.
    pub fn pop(&mut self) -> Result<(f64, T), QueueEmpty> {
        while let Some(Reverse(key)) = self.heap.pop() {
            let entry = &mut self.entries[key.slot];
            if entry.tombstoned {
                continue;
            }
            entry.tombstoned = true;
            let (priority, item) = (entry.priority, entry.item);
            self.lookup.remove(&item);
            return Ok((priority, item));
        }
        Err(QueueEmpty)
    }

    /// Highest live priority and its item, without removing it.
    ///
    /// Tombstoned roots encountered on the way are discarded.
    pub fn peek(&mut self) -> Option<(f64, T)> {
        while let Some(&Reverse(key)) = self.heap.peek() {
            let entry = &self.entries[key.slot];
            if entry.tombstoned {
                self.heap.pop();
                continue;
            }
            return Some((entry.priority, entry.item));
        }
        None
    }
}
