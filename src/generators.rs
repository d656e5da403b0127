//! Utilities for generating examples, benchmarks, and test cases.

use rand::{rngs::StdRng, Rng, SeedableRng as _};

use crate::Building;

/// Generate `count` random buildings.
///
/// Each building spans two x coordinates drawn from
/// `0..width` (swapped if necessary so that `x1 <= x2`) and has a height in
/// `1..height`.
///
/// # Panics
///
/// Panics if `width < 1` or `height < 2`.
pub fn random_buildings(
    rng: &mut impl Rng,
    width: i64,
    height: i64,
    count: usize,
) -> Vec<Building> {
    assert!(width >= 1, "width must be at least 1");
    assert!(height >= 2, "height must be at least 2");
    (0..count)
        .map(|_| {
            let a = rng.gen_range(0..width);
            let b = rng.gen_range(0..width);
            let h = rng.gen_range(1..height);
            Building {
                x1: a.min(b),
                x2: a.max(b),
                height: h,
            }
        })
        .collect()
}

/// Like [`random_buildings`], but reproducible from a seed.
pub fn seeded(seed: u64, width: i64, height: i64, count: usize) -> Vec<Building> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_buildings(&mut rng, width, height, count)
}

/// A staircase of `n` overlapping buildings, each one shorter and further
/// right than the last.
///
/// Every building is visible, so the skyline has `2n + 2` points.
pub fn staircase(n: usize) -> Vec<Building> {
    let n = n as i64;
    (0..n)
        .map(|i| Building {
            x1: 2 * i,
            x2: 2 * i + 4,
            height: n - i,
        })
        .collect()
}

/// `n` buildings nested inside each other, tallest innermost.
///
/// Every building is still open when the innermost one opens, so this keeps
/// the active set as large as possible.
pub fn nested(n: usize) -> Vec<Building> {
    let n = n as i64;
    (0..n)
        .map(|i| Building {
            x1: i,
            x2: 2 * n - i,
            height: i + 1,
        })
        .collect()
}
