//! Fixed-capacity binary min-heap used to build Huffman trees.
//!
//! Positions are 1-indexed, so the parent of `p` is `p / 2` and its children
//! are `2p` and `2p + 1`. Position `p` is stored at `entries[p - 1]`.
//!
//! The heap never holds more than one entry per distinct byte value: every
//! merge pops two entries and pushes one, so 256 slots are always enough.

use crate::error::{Error, Result};

/// Maximum number of live entries.
pub const MAX_ENTRIES: usize = 256;

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    payload: T,
}

/// Min-heap of `(weight, payload)` pairs ordered by weight.
///
/// Equal weights are not ordered against each other, but the pop order is a
/// pure function of the insertion sequence, so two heaps fed identically
/// always agree.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            entries: Vec::with_capacity(MAX_ENTRIES),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight of the minimum entry, if any.
    pub fn peek_weight(&self) -> Option<u64> {
        self.entries.first().map(|e| e.weight)
    }

    fn weight_at(&self, pos: usize) -> u64 {
        self.entries[pos - 1].weight
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a - 1, b - 1);
    }

    /// Adds an entry, sifting it up while its parent is heavier.
    pub fn insert(&mut self, weight: u64, payload: T) -> Result<()> {
        if self.entries.len() >= MAX_ENTRIES {
            return Err(Error::HeapOverflow);
        }
        self.entries.push(Entry { weight, payload });
        self.sift_up(self.entries.len());
        Ok(())
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 1 {
            let parent = pos / 2;
            if self.weight_at(parent) <= self.weight_at(pos) {
                break;
            }
            self.swap(parent, pos);
            pos = parent;
        }
    }

    /// Removes and returns the minimum entry.
    ///
    /// The root's hole is pushed down to a leaf by promoting the lighter
    /// child at every level; the last entry then fills the hole and sifts
    /// up into place.
    pub fn pop_min(&mut self) -> Result<(u64, T)> {
        let n = self.entries.len();
        if n == 0 {
            return Err(Error::EmptyHeap);
        }

        let mut hole = 1;
        loop {
            let left = 2 * hole;
            if left > n {
                break;
            }
            let right = left + 1;
            let child = if right <= n && self.weight_at(right) <= self.weight_at(left) {
                right
            } else {
                left
            };
            self.swap(hole, child);
            hole = child;
        }

        // The old root now sits at `hole`; trade places with the last entry.
        self.swap(hole, n);
        let Entry { weight, payload } = self.entries.pop().ok_or(Error::EmptyHeap)?;
        if hole < n {
            self.sift_up(hole);
        }

        debug_assert!(self.is_heap_ordered());
        Ok((weight, payload))
    }

    /// Checks that no entry is lighter than its parent.
    pub fn is_heap_ordered(&self) -> bool {
        (2..=self.entries.len()).all(|pos| self.weight_at(pos / 2) <= self.weight_at(pos))
    }
}
