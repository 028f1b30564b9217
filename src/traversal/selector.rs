//! Best-first frontier — a min-f priority queue over branches.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::BranchId;

/// One frontier entry. Ordering is reversed so the std max-heap pops the
/// smallest f first; equal f falls back to insertion order (stable FIFO).
struct Entry {
    f: f64,
    seq: u64,
    branch: BranchId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // f values are validated finite before they reach the frontier,
        // so total_cmp agrees with the usual numeric order here.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority structure driving expansion order: lowest f = g + h first,
/// FIFO among equals.
#[derive(Default)]
pub struct BestFirstSelector {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl BestFirstSelector {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new(), next_seq: 0 }
    }

    pub fn push(&mut self, branch: BranchId, f: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { f, seq, branch });
    }

    /// Pop the branch with minimal f.
    pub fn pop(&mut self) -> Option<BranchId> {
        self.heap.pop().map(|e| e.branch)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
