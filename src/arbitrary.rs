//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::Building;

/// The most buildings [`buildings`] will generate.
pub const MAX_BUILDINGS: usize = 64;

/// Generate an arbitrary well-formed building in `[0, max_x]` with height at most `max_height`.
pub fn building(
    max_x: i64,
    max_height: i64,
    u: &mut Unstructured<'_>,
) -> Result<Building, arbitrary::Error> {
    let a = u.int_in_range(0..=max_x)?;
    let b = u.int_in_range(0..=max_x)?;
    let height = u.int_in_range(0..=max_height)?;
    Ok(Building {
        x1: a.min(b),
        x2: a.max(b),
        height,
    })
}

/// Generate a building that shares some coordinates with one we've already made.
fn another_building(
    prev: &Building,
    max_x: i64,
    max_height: i64,
    u: &mut Unstructured<'_>,
) -> Result<Building, arbitrary::Error> {
    let mut b = building(max_x, max_height, u)?;
    match u.int_in_range(0..=3)? {
        0 => b.x1 = prev.x1.min(b.x2),
        1 => b.x1 = prev.x2.min(b.x2),
        2 => b.height = prev.height,
        _ => {}
    }
    if u.arbitrary()? {
        b.x2 = b.x2.max(prev.x2);
    }
    Ok(b)
}

/// Generate an arbitrary collection of buildings.
///
/// The coordinates are small, so that buildings often share edges, heights,
/// and closing positions.
pub fn buildings(u: &mut Unstructured<'_>) -> Result<Vec<Building>, arbitrary::Error> {
    let max_x = u.int_in_range(1..=32)?;
    let max_height = u.int_in_range(1..=16)?;
    let len = u.arbitrary_len::<[u8; 3]>()?.min(MAX_BUILDINGS);

    let mut ret: Vec<Building> = Vec::with_capacity(len);
    for _ in 0..len {
        let b = if ret.is_empty() || u.arbitrary()? {
            building(max_x, max_height, u)?
        } else {
            let prev = ret[u.choose_index(ret.len())?];
            another_building(&prev, max_x, max_height, u)?
        };
        ret.push(b);
    }
    Ok(ret)
}
