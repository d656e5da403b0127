//! The sweep-line that traces the skyline.
//!
//! The sweep visits buildings by increasing left edge. Before opening a
//! building, it closes every open building whose right edge is at or before
//! the new left edge; each closure drops the contour to the height of the
//! tallest building still open (if that is lower than the current height).
//! Opening a building raises the contour if the building is taller than the
//! current height. Once every building is open, the remaining ones are closed
//! in order of right edge.
//!
//! [`Sweeper`] exposes the sweep one event at a time, while [`Solver`] and
//! [`solve`] run it to completion.

use tracing::{debug, trace};

use crate::{
    active::{ActiveHeap, Closed},
    contour::ContourBuilder,
    geom::{Building, Point},
    index::{self, BuildingIdx},
    Error,
};

/// Scratch space for a sweep.
///
/// Keeping one of these around between sweeps avoids reallocating. Starting a
/// [`Sweeper`] resets everything in here, so nothing leaks from one sweep to
/// the next.
#[derive(Clone, Debug, Default)]
pub struct SweepBuffers {
    order: Vec<BuildingIdx>,
    active: ActiveHeap,
    contour: ContourBuilder,
}

impl SweepBuffers {
    /// Creates buffers big enough for sweeping `n` buildings without reallocating.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            order: Vec::with_capacity(n),
            active: ActiveHeap::with_capacity(n),
            // Each building contributes at most four corners.
            contour: ContourBuilder::with_capacity(4 * n),
        }
    }

    /// The contour traced by the most recent sweep.
    pub fn points(&self) -> &[Point] {
        self.contour.points()
    }

    /// Takes the contour traced by the most recent sweep.
    pub fn take_points(&mut self) -> Vec<Point> {
        self.contour.finish()
    }

    fn reset(&mut self) {
        self.order.clear();
        self.active.clear();
        self.contour.reset();
    }
}

/// Where a [`Sweeper`] is in its sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No events have been processed yet.
    Idle,
    /// The last event opened a building.
    Scanning,
    /// The last event closed a building that ended at or before the next left edge.
    Draining,
    /// The last event closed a building after all buildings were opened.
    Flushing,
    /// All buildings are closed and the contour is complete.
    Done,
}

/// A single event of the sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A building was opened.
    Opened(BuildingIdx),
    /// A building was closed.
    Closed(Closed),
}

/// A sweep in progress.
///
/// Creating a sweeper begins a sweep: it validates the input and resets the
/// buffers. The sweep ends when [`Sweeper::step`] returns `None`, at which
/// point the buffers hold the finished contour.
pub struct Sweeper<'bufs, 'bldgs> {
    buildings: &'bldgs [Building],
    bufs: &'bufs mut SweepBuffers,
    next: usize,
    phase: Phase,
}

impl<'bufs, 'bldgs> Sweeper<'bufs, 'bldgs> {
    /// Begins sweeping `buildings`.
    ///
    /// Returns an error if any building is malformed, in which case the buffers are untouched.
    pub fn new(
        buildings: &'bldgs [Building],
        bufs: &'bufs mut SweepBuffers,
    ) -> Result<Self, Error> {
        for (i, b) in buildings.iter().enumerate() {
            b.validate(i)?;
        }

        debug!(buildings = buildings.len(), "starting skyline sweep");
        bufs.reset();
        index::open_order(buildings, &mut bufs.order);

        Ok(Sweeper {
            buildings,
            bufs,
            next: 0,
            phase: Phase::Idle,
        })
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current height of the contour.
    pub fn height(&self) -> i64 {
        self.bufs.contour.height()
    }

    /// The contour traced so far.
    ///
    /// Horizontal moves are only committed when the contour next changes
    /// height, and the last vertical run may still slide.
    pub fn points(&self) -> &[Point] {
        self.bufs.contour.points()
    }

    /// Processes the next event, or returns `None` if the sweep is finished.
    pub fn step(&mut self) -> Option<Step> {
        if self.phase == Phase::Done {
            return None;
        }

        let Some(&idx) = self.bufs.order.get(self.next) else {
            return self.flush_one();
        };
        let building = self.buildings[idx.0];

        if self.bufs.active.any_closing_at_or_before(building.x1) {
            self.phase = Phase::Draining;
            return Some(Step::Closed(self.close_nearest()));
        }

        self.phase = Phase::Scanning;
        trace!(?idx, x = building.x1, height = building.height, "open");
        if building.height > self.height() {
            self.bufs.contour.step_to(building.x1, building.height);
        }
        self.bufs.active.insert(idx, &building);
        self.next += 1;
        Some(Step::Opened(idx))
    }

    /// Runs the sweep to completion, returning the contour.
    pub fn run(mut self) -> &'bufs [Point] {
        while self.step().is_some() {}
        let Sweeper { bufs, .. } = self;
        let bufs: &'bufs SweepBuffers = bufs;
        bufs.points()
    }

    fn flush_one(&mut self) -> Option<Step> {
        if self.bufs.active.is_empty() {
            debug_assert_eq!(self.height(), 0);
            debug!(points = self.points().len(), "finished skyline sweep");
            self.phase = Phase::Done;
            return None;
        }
        self.phase = Phase::Flushing;
        Some(Step::Closed(self.close_nearest()))
    }

    fn close_nearest(&mut self) -> Closed {
        let closed = self.bufs.active.pop_nearest_close();
        if closed.remaining_height < self.height() {
            trace!(
                idx = ?closed.idx,
                x = closed.close,
                height = closed.remaining_height,
                "drop"
            );
            self.bufs
                .contour
                .step_to(closed.close, closed.remaining_height);
        }
        closed
    }
}

/// A reusable skyline solver.
///
/// Solving many inputs with one solver reuses its scratch space.
#[derive(Clone, Debug, Default)]
pub struct Solver {
    bufs: SweepBuffers,
}

impl Solver {
    /// Creates a solver with no scratch space allocated yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with room for sweeping `n` buildings without reallocating.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            bufs: SweepBuffers::with_capacity(n),
        }
    }

    /// Computes the skyline contour of `buildings`.
    ///
    /// The returned contour borrows from the solver, and is overwritten by the next solve.
    pub fn solve(&mut self, buildings: &[Building]) -> Result<&[Point], Error> {
        Ok(Sweeper::new(buildings, &mut self.bufs)?.run())
    }
}

/// Computes the skyline contour of `buildings`.
///
/// The buildings can come in any order. The contour starts on the baseline at
/// the left edge of the first visible building, alternates between vertical
/// and horizontal moves, and ends on the baseline. If no building is visible,
/// the contour is empty.
pub fn solve(buildings: &[Building]) -> Result<Vec<Point>, Error> {
    let mut bufs = SweepBuffers::with_capacity(buildings.len());
    Sweeper::new(buildings, &mut bufs)?.run();
    Ok(bufs.take_points())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;
    use crate::contour::check_contour;

    fn buildings(bs: &[(i64, i64, i64)]) -> Vec<Building> {
        bs.iter().copied().map(Building::from).collect()
    }

    fn pts(points: &[(i64, i64)]) -> Vec<Point> {
        points.iter().copied().map(Point::from).collect()
    }

    fn solve_tuples(bs: &[(i64, i64, i64)]) -> Vec<(i64, i64)> {
        solve(&buildings(bs))
            .unwrap()
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect()
    }

    #[test]
    fn empty() {
        assert!(solve(&[]).unwrap().is_empty());
    }

    #[test]
    fn single_in_the_middle() {
        assert_eq!(
            solve_tuples(&[(2, 4, 3)]),
            vec![(2, 0), (2, 3), (4, 3), (4, 0)]
        );
    }

    #[test]
    fn twin_towers() {
        assert_eq!(
            solve_tuples(&[(2, 4, 3), (6, 8, 3)]),
            vec![(2, 0), (2, 3), (4, 3), (4, 0), (6, 0), (6, 3), (8, 3), (8, 0)]
        );
    }

    #[test]
    fn joined_towers() {
        assert_eq!(
            solve_tuples(&[(2, 6, 5), (8, 12, 5), (4, 10, 3)]),
            vec![(2, 0), (2, 5), (6, 5), (6, 3), (8, 3), (8, 5), (12, 5), (12, 0)]
        );
    }

    #[test]
    fn mirror_stair() {
        assert_eq!(
            solve_tuples(&[(2, 6, 1), (4, 10, 3), (8, 12, 5)]),
            vec![(2, 0), (2, 1), (4, 1), (4, 3), (8, 3), (8, 5), (12, 5), (12, 0)]
        );
    }

    #[test]
    fn shared_walls() {
        assert_eq!(
            solve_tuples(&[(2, 4, 3), (4, 6, 3)]),
            vec![(2, 0), (2, 3), (6, 3), (6, 0)]
        );
        assert_eq!(
            solve_tuples(&[(4, 6, 5), (2, 4, 3)]),
            vec![(2, 0), (2, 3), (4, 3), (4, 5), (6, 5), (6, 0)]
        );
    }

    #[test]
    fn degenerate_buildings() {
        assert!(solve_tuples(&[(3, 3, 5)]).is_empty());
        assert!(solve_tuples(&[(1, 3, 0)]).is_empty());
        assert_eq!(
            solve_tuples(&[(0, 10, 2), (5, 5, 7)]),
            vec![(0, 0), (0, 2), (10, 2), (10, 0)]
        );
        assert_eq!(
            solve_tuples(&[(5, 8, 3), (5, 5, 7)]),
            vec![(5, 0), (5, 3), (8, 3), (8, 0)]
        );
        // Zero-width buildings on the baseline, after and between real ones.
        assert_eq!(
            solve_tuples(&[(2, 4, 3), (6, 6, 5)]),
            vec![(2, 0), (2, 3), (4, 3), (4, 0)]
        );
        assert_eq!(
            solve_tuples(&[(2, 4, 3), (6, 6, 5), (8, 10, 1)]),
            vec![(2, 0), (2, 3), (4, 3), (4, 0), (8, 0), (8, 1), (10, 1), (10, 0)]
        );
    }

    #[test]
    fn rejects_malformed() {
        assert_matches!(
            solve(&buildings(&[(2, 4, 3), (6, 5, 1)])),
            Err(Error::InvertedSpan { index: 1, .. })
        );
        assert_matches!(
            solve(&buildings(&[(2, 4, -3)])),
            Err(Error::NegativeHeight { index: 0, .. })
        );
    }

    #[test]
    fn solver_reuse() {
        let mut solver = Solver::with_capacity(2);
        let first = solver
            .solve(&buildings(&[(2, 6, 5), (8, 12, 5), (4, 10, 3)]))
            .unwrap()
            .to_vec();
        assert_eq!(first.len(), 8);
        assert_eq!(
            solver.solve(&buildings(&[(2, 4, 3)])).unwrap(),
            pts(&[(2, 0), (2, 3), (4, 3), (4, 0)])
        );
        assert!(solver.solve(&buildings(&[(1, 0, 3)])).is_err());
        assert!(solver.solve(&[]).unwrap().is_empty());
    }

    #[test]
    fn phases() {
        let bs = buildings(&[(2, 4, 3), (6, 8, 3)]);
        let mut bufs = SweepBuffers::default();
        let mut sweeper = Sweeper::new(&bs, &mut bufs).unwrap();
        assert_eq!(sweeper.phase(), Phase::Idle);

        assert_eq!(sweeper.step(), Some(Step::Opened(BuildingIdx(0))));
        assert_eq!(sweeper.phase(), Phase::Scanning);
        assert_eq!(sweeper.height(), 3);

        assert_matches!(
            sweeper.step(),
            Some(Step::Closed(Closed {
                idx: BuildingIdx(0),
                close: 4,
                remaining_height: 0,
            }))
        );
        assert_eq!(sweeper.phase(), Phase::Draining);
        assert_eq!(sweeper.height(), 0);

        assert_eq!(sweeper.step(), Some(Step::Opened(BuildingIdx(1))));
        assert_eq!(sweeper.phase(), Phase::Scanning);

        assert_matches!(sweeper.step(), Some(Step::Closed(_)));
        assert_eq!(sweeper.phase(), Phase::Flushing);

        assert_eq!(sweeper.step(), None);
        assert_eq!(sweeper.phase(), Phase::Done);
        assert_eq!(sweeper.step(), None);
        assert_eq!(sweeper.points().len(), 8);
    }

    #[test]
    fn arbitrary_inputs() {
        arbtest::arbtest(|u| {
            let bs = crate::arbitrary::buildings(u)?;
            let points = solve(&bs).unwrap();
            check_contour(&points).unwrap();
            assert_eq!(tuples(&points), skyline_util::naive_skyline(&triples(&bs)));
            Ok(())
        });
    }

    fn triples(bs: &[Building]) -> Vec<(i64, i64, i64)> {
        bs.iter().map(|b| (b.x1, b.x2, b.height)).collect()
    }

    fn tuples(points: &[Point]) -> Vec<(i64, i64)> {
        points.iter().map(|p| (p.x, p.y)).collect()
    }

    fn building_strategy() -> impl Strategy<Value = Building> {
        (0i64..24, 0i64..8, 0i64..8).prop_map(|(x1, w, height)| Building {
            x1,
            x2: x1 + w,
            height,
        })
    }

    proptest! {
        #[test]
        fn well_formed_and_grounded(bs in prop::collection::vec(building_strategy(), 0..24)) {
            let points = solve(&bs).unwrap();
            prop_assert_eq!(check_contour(&points), Ok(()));
            if bs.iter().any(Building::is_visible) {
                prop_assert!(!points.is_empty());
            } else {
                prop_assert!(points.is_empty());
            }
        }

        #[test]
        fn occlusion(bs in prop::collection::vec(building_strategy(), 0..24)) {
            let points = solve(&bs).unwrap();
            let expected = skyline_util::column_heights(&triples(&bs), -1..34);
            let actual: Vec<_> = (-1..34).map(|x| crate::contour::height_at(&points, x)).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn order_independence(
            (bs, perm) in prop::collection::vec(building_strategy(), 0..24)
                .prop_flat_map(|bs| {
                    let n = bs.len();
                    (Just(bs), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
                })
        ) {
            let shuffled: Vec<_> = perm.iter().map(|&i| bs[i]).collect();
            prop_assert_eq!(solve(&bs).unwrap(), solve(&shuffled).unwrap());
        }

        #[test]
        fn dominated_buildings_are_invisible(
            bs in prop::collection::vec(building_strategy(), 1..24),
            pick in any::<prop::sample::Index>(),
            (shrink_left, shrink_right, shrink_height) in (0i64..4, 0i64..4, 0i64..4),
        ) {
            let host = *pick.get(&bs);
            let x1 = (host.x1 + shrink_left).min(host.x2);
            let hidden = Building {
                x1,
                x2: (host.x2 - shrink_right).max(x1),
                height: (host.height - shrink_height).max(0),
            };
            prop_assert!(host.dominates(&hidden));

            let mut with_hidden = bs.clone();
            with_hidden.push(hidden);
            prop_assert_eq!(solve(&bs).unwrap(), solve(&with_hidden).unwrap());
        }

        #[test]
        fn solver_matches_oneshot(
            first in prop::collection::vec(building_strategy(), 0..16),
            second in prop::collection::vec(building_strategy(), 0..16),
        ) {
            let mut solver = Solver::new();
            solver.solve(&first).unwrap();
            let reused = solver.solve(&second).unwrap().to_vec();
            prop_assert_eq!(reused, solve(&second).unwrap());
        }
    }
}
