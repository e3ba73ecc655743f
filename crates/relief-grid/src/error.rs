//! Error types for grid processing.

use thiserror::Error;

/// Result type for grid processing operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised by the sample-grid processing stages.
#[derive(Debug, Error)]
pub enum DataError {
    /// The grid contains no finite samples at all.
    #[error("no usable samples: grid contains no finite values")]
    NoUsableSamples,

    /// The grid has a zero-sized axis.
    #[error("empty grid: {rows}x{cols}")]
    EmptyGrid {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
}
