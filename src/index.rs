//! The order in which the sweep visits buildings.
//!
//! Only the left-edge order is materialized up front. Right edges are ordered
//! lazily by the [`ActiveHeap`](crate::active::ActiveHeap), which only ever
//! holds the buildings that are currently open.

use crate::geom::Building;

/// The position of a building in the caller's input.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildingIdx(pub usize);

impl std::fmt::Debug for BuildingIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "b_{}", self.0)
    }
}

/// Fills `order` with the indices of `buildings`, sorted by left edge.
///
/// Buildings sharing a left edge keep their input order, so the sweep is
/// reproducible for a given input. The previous contents of `order` are
/// discarded but its allocation is kept.
pub fn open_order(buildings: &[Building], order: &mut Vec<BuildingIdx>) {
    order.clear();
    order.extend((0..buildings.len()).map(BuildingIdx));
    // `sort_by_key` is stable.
    order.sort_by_key(|idx| buildings[idx.0].x1);
}
