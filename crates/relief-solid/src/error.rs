//! Error types for solid construction.

use thiserror::Error;

/// Result type for solid construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors raised while building a solid from a height grid.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The grid is too small to enclose any volume.
    #[error("degenerate footprint: {rows}x{cols} grid cannot form a solid (need at least 2x2)")]
    DegenerateFootprint {
        /// Number of grid rows.
        rows: usize,
        /// Number of grid columns.
        cols: usize,
    },

    /// The pixel pitch is zero, negative or non-finite.
    #[error("invalid pixel pitch: {0} mm")]
    InvalidPitch(f64),

    /// Base, relief and border are all flat at `z = 0`; the solid would
    /// have no height at all.
    #[error("zero-height solid: base, relief and border all collapse to z = 0")]
    ZeroHeight,
}
