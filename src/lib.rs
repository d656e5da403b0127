#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod active;
#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod contour;
mod geom;
pub mod index;
pub mod io;
pub mod render;
pub mod sweep;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::{Building, Point};
pub use sweep::{solve, Solver};

/// The input buildings were faulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A building's left edge was to the right of its right edge.
    InvertedSpan {
        /// The position of the building in the input.
        index: usize,
        /// The offending building.
        building: Building,
    },
    /// A building had a negative height.
    NegativeHeight {
        /// The position of the building in the input.
        index: usize,
        /// The offending building.
        building: Building,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvertedSpan { index, building } => write!(
                f,
                "building {index} has its left edge {} after its right edge {}",
                building.x1, building.x2
            ),
            Error::NegativeHeight { index, building } => write!(
                f,
                "building {index} has negative height {}",
                building.height
            ),
        }
    }
}

impl std::error::Error for Error {}
