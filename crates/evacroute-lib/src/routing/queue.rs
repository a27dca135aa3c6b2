//! Frontier priority queue for the route search.
//!
//! A binary min-heap keyed by estimated total cost. There is no decrease-key:
//! when a node's score improves a fresh entry is pushed and the stale one is
//! left in the heap for the search to discard when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::network::NodeId;

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub(crate) f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A node waiting to be expanded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrontierEntry {
    pub node: NodeId,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl FrontierEntry {
    /// `cost` is the accumulated g-score, `estimate` the f-score (g + h).
    pub fn new(node: NodeId, cost: f64, estimate: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(estimate),
        }
    }

    pub fn cost(&self) -> f64 {
        self.cost.0
    }

    pub fn estimate(&self) -> f64 {
        self.estimate.0
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of frontier entries.
#[derive(Debug, Default)]
pub struct FrontierQueue {
    heap: BinaryHeap<FrontierEntry>,
}

impl FrontierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        self.heap.push(entry);
    }

    /// Remove and return the entry with the lowest estimate.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
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

    fn entry(node: &str, estimate: f64) -> FrontierEntry {
        FrontierEntry::new(node.to_string(), 0.0, estimate)
    }

    #[test]
    fn pops_lowest_estimate_first() {
        let mut queue = FrontierQueue::new();
        for (node, estimate) in [("c", 30.0), ("a", 10.0), ("d", 40.0), ("b", 20.0)] {
            queue.push(entry(node, estimate));
        }

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|entry| entry.node)
            .collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn ties_pop_in_node_id_order() {
        let mut queue = FrontierQueue::new();
        queue.push(entry("n2", 5.0));
        queue.push(entry("n1", 5.0));
        assert_eq!(queue.pop().unwrap().node, "n1");
        assert_eq!(queue.pop().unwrap().node, "n2");
    }

    #[test]
    fn duplicates_coexist() {
        let mut queue = FrontierQueue::new();
        queue.push(FrontierEntry::new("a".to_string(), 9.0, 9.0));
        queue.push(FrontierEntry::new("a".to_string(), 4.0, 6.5));
        assert_eq!(queue.len(), 2);

        let best = queue.pop().unwrap();
        assert_eq!(best.cost(), 4.0);
        assert_eq!(best.estimate(), 6.5);
        assert_eq!(queue.pop().unwrap().cost(), 9.0);
        assert!(queue.is_empty());
    }
}
