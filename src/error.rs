//! Error taxonomy for raster runs.
//!
//! All of these are recoverable: a `done`/`done_high` call that returns one
//! of these aborts cleanly with no partial-state leak, and the `Raster`
//! instance remains valid for the next call (see `crate::raster`).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterError {
    /// Growing the edge pool or edge table failed.
    OutOfMemory,
    /// The polygon would require more than 65,535 edges.
    TooManyEdges,
    /// Null/empty polygon data, an unknown fill rule, or malformed contour
    /// counts (e.g. a count of 1, which cannot close a contour).
    InvalidArgument,
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::OutOfMemory => write!(f, "out of memory growing edge pool/table"),
            RasterError::TooManyEdges => write!(f, "polygon exceeds 65535 edges"),
            RasterError::InvalidArgument => write!(f, "invalid polygon, bounds, or fill rule"),
        }
    }
}

impl std::error::Error for RasterError {}

pub type RasterResult<T> = Result<T, RasterError>;
