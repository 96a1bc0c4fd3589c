//! Bounded max-heap of ranked candidates with a total order over f64 keys.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::search::cmp_keys;

/// A candidate entry with an ascending rank key and its input position.
///
/// Entries marked `last` rank after every unmarked entry.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub last: bool,
    pub key: f64,
    pub position: usize,
}

impl Neighbor {
    pub fn new(position: usize, key: f64) -> Self {
        Self {
            last: false,
            key,
            position,
        }
    }

    /// Rank after every entry not marked the same way.
    pub fn ranked_last(mut self, last: bool) -> Self {
        self.last = last;
        self
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Tier, then key (NaN last), then input position, which reproduces the tie
// order of a stable sort.
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last
            .cmp(&other.last)
            .then_with(|| cmp_keys(self.key, other.key))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Max-heap of neighbors (worst-ranked on top), bounded to the best `limit`.
#[derive(Debug)]
pub struct MaxHeap {
    heap: BinaryHeap<Neighbor>,
    limit: usize,
}

impl MaxHeap {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(limit.saturating_add(1).min(1024)),
            limit,
        }
    }

    /// Push, then pop the worst entry if the heap exceeds its limit.
    pub fn push_bounded(&mut self, n: Neighbor) {
        if self.limit == 0 {
            return;
        }
        if self.heap.len() == self.limit {
            match self.heap.peek() {
                Some(worst) if n >= *worst => return,
                _ => {}
            }
        }
        self.heap.push(n);
        if self.heap.len() > self.limit {
            self.heap.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a Vec sorted best-first.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}
