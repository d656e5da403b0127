//! ASCII-art renderings of buildings and skylines.
//!
//! Every world unit is two characters wide: one for the lattice point and
//! one for the connector to its right. Corners are drawn as `+`, horizontal
//! runs as `-` and vertical runs as `|`. Where two different strokes meet,
//! they also become a `+`. The picture is framed like this:
//!
//! ```text
//! /======\
//! |+---+ |
//! ||   | |
//! \======/
//! ```

use crate::{Building, Point};

/// A rectangle of world coordinates, inclusive on all sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    /// The leftmost column.
    pub min_x: i64,
    /// The rightmost column.
    pub max_x: i64,
    /// The bottom row.
    pub min_y: i64,
    /// The top row.
    pub max_y: i64,
}

impl Bounds {
    /// The smallest bounds containing every building, and the baseline.
    pub fn of_buildings(buildings: &[Building]) -> Self {
        let mut iter = buildings.iter();
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        iter.fold(
            Bounds {
                min_x: first.x1,
                max_x: first.x2,
                min_y: 0,
                max_y: first.height.max(0),
            },
            |b, bldg| Bounds {
                min_x: b.min_x.min(bldg.x1),
                max_x: b.max_x.max(bldg.x2),
                min_y: 0,
                max_y: b.max_y.max(bldg.height),
            },
        )
    }

    /// The smallest bounds containing every point.
    pub fn of_points(points: &[Point]) -> Self {
        let mut iter = points.iter();
        let Some(first) = iter.next() else {
            return Bounds::default();
        };
        iter.fold(
            Bounds {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    /// Grows the bounds on every side, by a quarter of the extent along that
    /// axis or by 2, whichever is larger.
    pub fn inflated(self) -> Self {
        fn margin(extent: i64) -> i64 {
            let quarter = extent / 4;
            if quarter > 2 {
                quarter
            } else {
                2
            }
        }
        let dx = margin(self.max_x - self.min_x);
        let dy = margin(self.max_y - self.min_y);
        Bounds {
            min_x: self.min_x - dx,
            max_x: self.max_x + dx,
            min_y: self.min_y - dy,
            max_y: self.max_y + dy,
        }
    }

    /// Is the point `(x, y)` inside these bounds?
    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }
}

/// Something that couldn't be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The contour moved diagonally into the point at `index`.
    Diagonal {
        /// The position of the offending point.
        index: usize,
    },
    /// The contour moved leftwards into the point at `index`.
    BackwardsX {
        /// The position of the offending point.
        index: usize,
    },
    /// The point or building at `index` doesn't fit in the bounds.
    OutOfBounds {
        /// The position of the offending point or building.
        index: usize,
    },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Diagonal { index } => write!(f, "diagonal move into point {index}"),
            RenderError::BackwardsX { index } => write!(f, "backwards move into point {index}"),
            RenderError::OutOfBounds { index } => write!(f, "element {index} is out of bounds"),
        }
    }
}

impl std::error::Error for RenderError {}

struct Canvas {
    bounds: Bounds,
    width: usize,
    rows: Vec<Vec<u8>>,
}

impl Canvas {
    fn new(bounds: Bounds) -> Self {
        let width = 2 * (bounds.max_x - bounds.min_x + 1).max(0) as usize;
        let height = (bounds.max_y - bounds.min_y + 1).max(0) as usize;
        Canvas {
            bounds,
            width,
            rows: vec![vec![b' '; width]; height],
        }
    }

    fn cell(&self, x: i64, y: i64) -> (usize, usize) {
        debug_assert!(self.bounds.contains(x, y));
        (
            2 * (x - self.bounds.min_x) as usize,
            (self.bounds.max_y - y) as usize,
        )
    }

    fn stroke(&mut self, col: usize, row: usize, ch: u8) {
        let old = &mut self.rows[row][col];
        if *old == b' ' || *old == ch {
            *old = ch;
        } else {
            *old = b'+';
        }
    }

    fn corner(&mut self, x: i64, y: i64) {
        let (col, row) = self.cell(x, y);
        self.rows[row][col] = b'+';
    }

    fn horizontal(&mut self, x0: i64, x1: i64, y: i64) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        for x in x0..x1 {
            let (col, row) = self.cell(x, y);
            self.stroke(col + 1, row, b'-');
            if x > x0 {
                self.stroke(col, row, b'-');
            }
        }
        self.corner(x0, y);
        self.corner(x1, y);
    }

    fn vertical(&mut self, x: i64, y0: i64, y1: i64) {
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        for y in (y0 + 1)..y1 {
            let (col, row) = self.cell(x, y);
            self.stroke(col, row, b'|');
        }
        self.corner(x, y0);
        self.corner(x, y1);
    }

    fn finish(self) -> String {
        let mut out = String::with_capacity((self.width + 3) * (self.rows.len() + 2));
        let rule = "=".repeat(self.width);
        out.push('/');
        out.push_str(&rule);
        out.push_str("\\\n");
        for row in &self.rows {
            out.push('|');
            out.extend(row.iter().map(|&b| b as char));
            out.push_str("|\n");
        }
        out.push('\\');
        out.push_str(&rule);
        out.push_str("/\n");
        out
    }
}

/// Draws the outline of every visible building.
///
/// Buildings with no width or no height are skipped.
pub fn render_buildings(buildings: &[Building], bounds: Bounds) -> Result<String, RenderError> {
    let mut canvas = Canvas::new(bounds);
    for (index, b) in buildings.iter().enumerate() {
        if !b.is_visible() {
            continue;
        }
        if !bounds.contains(b.x1, 0) || !bounds.contains(b.x2, b.height) {
            return Err(RenderError::OutOfBounds { index });
        }
        canvas.horizontal(b.x1, b.x2, 0);
        canvas.horizontal(b.x1, b.x2, b.height);
        canvas.vertical(b.x1, 0, b.height);
        canvas.vertical(b.x2, 0, b.height);
    }
    Ok(canvas.finish())
}

/// Draws a contour as a path through its points.
///
/// The contour must only move horizontally rightwards or vertically.
pub fn render_skyline(points: &[Point], bounds: Bounds) -> Result<String, RenderError> {
    if let Some(index) = points.iter().position(|p| !bounds.contains(p.x, p.y)) {
        return Err(RenderError::OutOfBounds { index });
    }

    let mut canvas = Canvas::new(bounds);
    for (i, pair) in points.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let index = i + 1;
        if to.x < from.x {
            return Err(RenderError::BackwardsX { index });
        }
        if from.x != to.x && from.y != to.y {
            return Err(RenderError::Diagonal { index });
        }
        if from.y == to.y {
            if from.x != to.x {
                canvas.horizontal(from.x, to.x, from.y);
            }
        } else {
            canvas.vertical(from.x, from.y, to.y);
        }
    }
    Ok(canvas.finish())
}
