//! Skyline contours: building them, checking them, and reading them back.
//!
//! A contour is a rectilinear polyline that starts on the baseline at the left
//! edge of the first visible building and ends on the baseline at the right
//! edge of the last one. Moves strictly alternate between vertical and
//! horizontal, so every point except the first and last is a corner.

use crate::geom::Point;

/// Turns a stream of axis-aligned pen moves into a coalesced contour.
///
/// The pen starts on the baseline. Horizontal moves are only remembered in
/// the pen position; a corner is committed when a vertical move actually
/// changes the height. So the committed points always end with a vertical
/// move, and the pen sits at the same height as the last point, possibly to
/// its right.
///
/// A vertical move straight after another one slides the tip instead of
/// adding a corner. If the slide lands back where the vertical run started,
/// the run is withdrawn together with the horizontal move that led into it,
/// which becomes pending again. That's what happens when one building closes
/// at exactly the place where the next one of the same height opens, and
/// when a zero-width building rises and falls in place.
#[derive(Clone, Debug, Default)]
pub struct ContourBuilder {
    cursor: Point,
    points: Vec<Point>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn axis(from: Point, to: Point) -> Axis {
    debug_assert!(from.x == to.x || from.y == to.y);
    if from.y == to.y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

impl ContourBuilder {
    /// Creates a builder with the pen at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with room for `cap` points before reallocating.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            cursor: Point::default(),
            points: Vec::with_capacity(cap),
        }
    }

    /// Forgets the current contour and puts the pen back at the origin.
    pub fn reset(&mut self) {
        self.cursor = Point::default();
        self.points.clear();
    }

    /// The current pen position.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// The current pen height.
    pub fn height(&self) -> i64 {
        self.cursor.y
    }

    /// The contour so far.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Takes the finished contour, leaving the builder empty.
    pub fn finish(&mut self) -> Vec<Point> {
        self.cursor = Point::default();
        std::mem::take(&mut self.points)
    }

    /// Moves the pen horizontally to `x`.
    ///
    /// Once the contour has started, the pen may only move to the right.
    pub fn to_x(&mut self, x: i64) {
        debug_assert!(self.points.is_empty() || x >= self.cursor.x);
        self.cursor.x = x;
    }

    /// Moves the pen vertically to `y`.
    pub fn to_y(&mut self, y: i64) {
        if y == self.cursor.y {
            return;
        }
        let from = self.cursor;
        self.cursor.y = y;

        match self.points.last() {
            Some(last) if last.x == from.x => self.slide_tip(),
            _ => {
                // The corner where the pending horizontal move ends (or, for a
                // fresh contour, the grounded start point).
                self.points.push(from);
                self.points.push(self.cursor);
            }
        }
        self.check_invariants();
    }

    /// Moves the pen horizontally to `x` and then vertically to `y`.
    pub fn step_to(&mut self, x: i64, y: i64) {
        self.to_x(x);
        self.to_y(y);
    }

    // Continues the vertical run ending at the last point.
    fn slide_tip(&mut self) {
        let n = self.points.len();
        debug_assert!(n >= 2);
        self.points[n - 1] = self.cursor;
        if self.points[n - 2] != self.cursor {
            return;
        }

        // Back where the run started. Corners are committed in pairs, so the
        // run goes together with the corner that began it, and the horizontal
        // move into that corner is pending in the cursor again.
        self.points.truncate(n - 2);
    }

    #[cfg(feature = "slow-asserts")]
    fn check_invariants(&self) {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            assert_eq!(self.cursor.y, 0, "ungrounded pen with no contour");
            return;
        };
        assert_eq!(first.y, 0);
        assert_eq!(last.y, self.cursor.y, "pen left the last corner's height");
        assert!(last.x <= self.cursor.x, "pen behind the last corner");
        for w in self.points.windows(2) {
            assert_ne!(w[0], w[1], "duplicate point in {:?}", self.points);
        }
        for w in self.points.windows(3) {
            assert_ne!(
                axis(w[0], w[1]),
                axis(w[1], w[2]),
                "collinear points in {:?}",
                self.points
            );
        }
    }

    #[cfg(not(feature = "slow-asserts"))]
    fn check_invariants(&self) {}
}

/// A reason why a sequence of points is not a well-formed skyline contour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContourError {
    /// The contour has a single point.
    Degenerate,
    /// The contour doesn't start, or doesn't end, on the baseline.
    NotGrounded {
        /// The offending point.
        index: usize,
    },
    /// The contour dips below the baseline.
    BelowBaseline {
        /// The offending point.
        index: usize,
    },
    /// A point is repeated.
    Duplicate {
        /// The second copy of the point.
        index: usize,
    },
    /// A move changes both coordinates.
    Diagonal {
        /// The point at the end of the move.
        index: usize,
    },
    /// A move goes to the left.
    BackwardsX {
        /// The point at the end of the move.
        index: usize,
    },
    /// Two consecutive moves go along the same axis, or the contour starts or
    /// ends with a move along the baseline.
    Collinear {
        /// The point at the end of the second move.
        index: usize,
    },
}

impl std::fmt::Display for ContourError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContourError::Degenerate => write!(f, "contour has a single point"),
            ContourError::NotGrounded { index } => {
                write!(f, "contour point {index} should be on the baseline")
            }
            ContourError::BelowBaseline { index } => {
                write!(f, "contour point {index} is below the baseline")
            }
            ContourError::Duplicate { index } => write!(f, "contour point {index} is a duplicate"),
            ContourError::Diagonal { index } => {
                write!(f, "contour has a diagonal move to point {index}")
            }
            ContourError::BackwardsX { index } => {
                write!(f, "contour moves backwards to point {index}")
            }
            ContourError::Collinear { index } => {
                write!(f, "contour has a redundant corner before point {index}")
            }
        }
    }
}

impl std::error::Error for ContourError {}

/// Checks that `points` is a well-formed contour.
///
/// The empty contour is well-formed. Otherwise, the contour must start and end
/// on the baseline, never go below it, move only rightwards or vertically,
/// and alternate between vertical and horizontal moves (starting and ending
/// with a vertical one).
pub fn check_contour(points: &[Point]) -> Result<(), ContourError> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(());
    };
    if points.len() == 1 {
        return Err(ContourError::Degenerate);
    }
    if first.y != 0 {
        return Err(ContourError::NotGrounded { index: 0 });
    }
    if last.y != 0 {
        return Err(ContourError::NotGrounded {
            index: points.len() - 1,
        });
    }

    let mut prev_axis = Axis::Horizontal;
    for (i, w) in points.windows(2).enumerate() {
        let (from, to) = (w[0], w[1]);
        let index = i + 1;
        if to.y < 0 {
            return Err(ContourError::BelowBaseline { index });
        }
        if from == to {
            return Err(ContourError::Duplicate { index });
        }
        if from.x != to.x && from.y != to.y {
            return Err(ContourError::Diagonal { index });
        }
        if to.x < from.x {
            return Err(ContourError::BackwardsX { index });
        }
        let ax = axis(from, to);
        if ax == prev_axis {
            return Err(ContourError::Collinear { index });
        }
        prev_axis = ax;
    }

    if prev_axis != Axis::Vertical {
        return Err(ContourError::Collinear {
            index: points.len() - 1,
        });
    }
    Ok(())
}

/// The height of a well-formed contour over the unit column starting at `x`.
///
/// This is zero outside the contour.
pub fn height_at(points: &[Point], x: i64) -> i64 {
    // The last point at or to the left of `x` starts the horizontal run covering `x`.
    match points.partition_point(|p| p.x <= x) {
        0 => 0,
        i => points[i - 1].y,
    }
}

/// The region below a well-formed contour, as a closed kurbo path.
///
/// `y` increases upwards from the baseline, so flip the result before drawing
/// into a y-down coordinate system.
pub fn to_bez_path(points: &[Point]) -> kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let mut points = points.iter();
    if let Some(p) = points.next() {
        path.move_to(p.to_kurbo());
        for p in points {
            path.line_to(p.to_kurbo());
        }
        path.close_path();
    }
    path
}
