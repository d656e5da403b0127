//! Geometric primitives: buildings and contour points.

/// A building standing on the baseline `y = 0`.
///
/// The building covers the half-open horizontal span `[x1, x2)` up to `height`.
/// A well-formed building has `x1 <= x2` and `height >= 0`; [`Building::new`]
/// enforces that, and [`solve`](crate::solve) re-checks it because the fields
/// are public.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Building {
    /// Left edge.
    pub x1: i64,
    /// Right edge.
    pub x2: i64,
    /// Height above the baseline.
    pub height: i64,
}

impl std::fmt::Debug for Building {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}) ^{}", self.x1, self.x2, self.height)
    }
}

impl Building {
    /// Create a new building, checking that it is well-formed.
    pub fn new(x1: i64, x2: i64, height: i64) -> Result<Self, crate::Error> {
        let b = Building { x1, x2, height };
        b.validate(0)?;
        Ok(b)
    }

    /// Checks the building invariants, reporting a failure at position `index` of the input.
    pub(crate) fn validate(&self, index: usize) -> Result<(), crate::Error> {
        if self.x1 > self.x2 {
            Err(crate::Error::InvertedSpan {
                index,
                building: *self,
            })
        } else if self.height < 0 {
            Err(crate::Error::NegativeHeight {
                index,
                building: *self,
            })
        } else {
            Ok(())
        }
    }

    /// The horizontal extent of this building.
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    /// Does this building cover the column at `x`?
    pub fn covers(&self, x: i64) -> bool {
        self.x1 <= x && x < self.x2
    }

    /// A building is visible if it has positive width and positive height.
    pub fn is_visible(&self) -> bool {
        self.width() > 0 && self.height > 0
    }

    /// Is `other` hidden inside this building, in both span and height?
    pub fn dominates(&self, other: &Building) -> bool {
        self.x1 <= other.x1 && other.x2 <= self.x2 && other.height <= self.height
    }

    /// This building as a kurbo rectangle, with `y` increasing upwards from the baseline.
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.x1 as f64, 0.0, self.x2 as f64, self.height as f64)
    }
}

impl From<(i64, i64, i64)> for Building {
    fn from((x1, x2, height): (i64, i64, i64)) -> Self {
        Self { x1, x2, height }
    }
}

/// A vertex of a skyline contour.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Height above the baseline.
    pub y: i64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }

    /// Converts to a kurbo point, with `y` increasing upwards from the baseline.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}
