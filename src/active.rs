//! The set of buildings that the sweep has opened but not yet closed.
//!
//! When a building closes, the contour drops to the tallest building that is
//! still open. Scanning the whole open set for that height on every closure is
//! quadratic when many buildings overlap, so instead we keep the open set in a
//! binary min-heap keyed by right edge and augment every heap node with the
//! maximum height in its subtree. Because of the heap property, everything in
//! a node's subtree closes at or after that node, so the augmented value is
//! the "remaining height" of that part of the heap, and the root's value is
//! the remaining height of the whole set.
//!
//! Every structural change touches at most two root-to-leaf paths, and we
//! re-derive the augmented values bottom-up along those paths, so both
//! insertion and removal stay logarithmic.

use crate::{geom::Building, index::BuildingIdx};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    idx: BuildingIdx,
    close: i64,
    height: i64,
    /// The maximum of `height` over this entry and all of its heap descendants.
    subtree_max: i64,
}

impl Entry {
    // Ties on the right edge are broken by input position, to keep popping deterministic.
    fn key(&self) -> (i64, BuildingIdx) {
        (self.close, self.idx)
    }
}

/// A building removed from the [`ActiveHeap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Closed {
    /// Which building closed.
    pub idx: BuildingIdx,
    /// Its right edge, where the contour may drop.
    pub close: i64,
    /// The maximum height among the buildings that are still open, or zero if none are.
    pub remaining_height: i64,
}

/// A min-heap of open buildings keyed by right edge, augmented with subtree maximum heights.
#[derive(Clone, Debug, Default)]
pub struct ActiveHeap {
    entries: Vec<Entry>,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

impl ActiveHeap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap with room for `cap` open buildings before reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
        }
    }

    /// Removes everything, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The number of open buildings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Are there no open buildings?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The smallest right edge among the open buildings.
    pub fn nearest_close(&self) -> Option<i64> {
        self.entries.first().map(|e| e.close)
    }

    /// Does any open building close at or before `x`?
    pub fn any_closing_at_or_before(&self, x: i64) -> bool {
        self.nearest_close().is_some_and(|close| close <= x)
    }

    /// The maximum height among the open buildings, or zero if there are none.
    pub fn max_height(&self) -> i64 {
        self.entries.first().map_or(0, |e| e.subtree_max)
    }

    /// Opens a building.
    pub fn insert(&mut self, idx: BuildingIdx, building: &Building) {
        let leaf = self.entries.len();
        self.entries.push(Entry {
            idx,
            close: building.x2,
            height: building.height,
            subtree_max: building.height,
        });
        self.sift_up(leaf);
        // Sifting up only moves entries along the path from `leaf` to the root.
        self.refresh_path(leaf);
        self.check_invariants();
    }

    /// Closes the building with the smallest right edge.
    ///
    /// The returned remaining height excludes the closed building, but includes
    /// any other building closing at the same place: those only stop counting
    /// once they are popped themselves.
    ///
    /// # Panics
    ///
    /// Panics if the heap is empty.
    pub fn pop_nearest_close(&mut self) -> Closed {
        assert!(!self.is_empty(), "popped an empty active set");

        let last = self.entries.len() - 1;
        let top = self.entries.swap_remove(0);

        if !self.entries.is_empty() {
            // The vacated leaf's ancestors lost a descendant, and sifting down
            // moves entries along a second path from the root.
            let settled = self.sift_down(0);
            self.refresh_path(parent(last));
            self.refresh_path(settled);
        }
        self.check_invariants();

        Closed {
            idx: top.idx,
            close: top.close,
            remaining_height: self.max_height(),
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i);
            if self.entries[i].key() < self.entries[p].key() {
                self.entries.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    // Returns the position where the sifted entry came to rest.
    fn sift_down(&mut self, mut i: usize) -> usize {
        let len = self.entries.len();
        loop {
            let mut smallest = i;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < len && self.entries[child].key() < self.entries[smallest].key() {
                    smallest = child;
                }
            }
            if smallest == i {
                return i;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }

    fn refresh(&mut self, i: usize) {
        let len = self.entries.len();
        let mut max = self.entries[i].height;
        for child in [2 * i + 1, 2 * i + 2] {
            if child < len {
                max = max.max(self.entries[child].subtree_max);
            }
        }
        self.entries[i].subtree_max = max;
    }

    // Re-derives the augmented values from `i` up to the root.
    fn refresh_path(&mut self, mut i: usize) {
        loop {
            self.refresh(i);
            if i == 0 {
                return;
            }
            i = parent(i);
        }
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) {
        let len = self.entries.len();
        for (i, entry) in self.entries.iter().enumerate() {
            let mut max = entry.height;
            for child in [2 * i + 1, 2 * i + 2] {
                if child < len {
                    let c = &self.entries[child];
                    assert!(entry.key() <= c.key(), "heap order broken at {i}: {self:?}");
                    max = max.max(c.subtree_max);
                }
            }
            assert_eq!(entry.subtree_max, max, "stale subtree max at {i}: {self:?}");
        }
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) {}
}
