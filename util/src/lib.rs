//! Brute-force skylines, for checking the sweep against.
//!
//! Everything here works on plain tuples: buildings are `(x1, x2, height)`
//! and contour points are `(x, y)`.

use std::ops::Range;

/// The height of the tallest building covering each column in `columns`.
///
/// A building covers the half-open span `[x1, x2)`; uncovered columns have height 0.
pub fn column_heights(buildings: &[(i64, i64, i64)], columns: Range<i64>) -> Vec<i64> {
    columns
        .map(|x| {
            buildings
                .iter()
                .filter(|&&(x1, x2, _)| x1 <= x && x < x2)
                .map(|&(_, _, h)| h)
                .max()
                .unwrap_or(0)
                .max(0)
        })
        .collect()
}

/// The skyline of `buildings`, computed by checking every interval between
/// consecutive edges.
///
/// The result has a pair of points at each edge where the height changes,
/// so it starts on the baseline at the leftmost visible wall and ends on the
/// baseline at the rightmost one.
pub fn naive_skyline(buildings: &[(i64, i64, i64)]) -> Vec<(i64, i64)> {
    let mut edges: Vec<i64> = buildings.iter().flat_map(|&(x1, x2, _)| [x1, x2]).collect();
    edges.sort_unstable();
    edges.dedup();

    let mut ret = Vec::new();
    let mut cur = 0;
    for &x in &edges {
        // The height on [x, next edge) is the same as the height at x.
        let h = column_heights(buildings, x..(x + 1))[0];
        if h != cur {
            ret.push((x, cur));
            ret.push((x, h));
            cur = h;
        }
    }
    ret
}
