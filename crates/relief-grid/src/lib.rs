//! Sample-grid processing for tactile-relief.
//!
//! Turns a raw 2D array of brightness samples into a bounded, print-safe
//! height map. The stages are pure functions over `ndarray::Array2<f64>`
//! and are meant to be composed in a fixed order by the pipeline crate:
//!
//! 1. [`sanitize`] - replace NaN/Inf samples with a deterministic fallback
//! 2. [`clip`] - symmetric percentile clipping
//! 3. [`invert`] / [`log_compress`] - optional tone mapping
//! 4. [`downsample`] / [`gaussian_smooth`] - optional resampling
//! 5. [`scale_heights`] - normalize to physical millimeters
//!
//! Every numeric choice that differs between array libraries (percentile
//! interpolation, Gaussian kernel truncation, edge handling) is pinned
//! down and documented at the definition site so results are reproducible.
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use relief_grid::{clip, scale_heights};
//!
//! let grid = array![[0.0, 1.0], [2.0, 3.0]];
//! let clipped = clip(&grid, 0.0); // p = 0 is the identity
//! let (heights, warning) = scale_heights(&clipped, 10.0, None);
//! assert!(warning.is_none());
//! assert_eq!(heights.heights[[1, 1]], 10.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod clip;
mod error;
mod resample;
mod sanitize;
mod scale;
mod tonemap;
mod warning;

pub use clip::{clip, percentile};
pub use error::{DataError, DataResult};
pub use resample::{downsample, gaussian_smooth, GAUSSIAN_TRUNCATION_SIGMAS};
pub use sanitize::sanitize;
pub use scale::{scale_heights, HeightGrid};
pub use tonemap::{invert, log_compress, LOG_COMPRESSION};
pub use warning::NumericWarning;

/// A raw 2D grid of brightness samples, row-major `(rows, cols)`.
///
/// May contain NaN/±Inf before [`sanitize`] runs; all downstream stages
/// assume finite values.
pub type SampleGrid = ndarray::Array2<f64>;
