//! Height normalization and physical scaling.

use ndarray::Array2;
use tracing::{debug, warn};

use crate::warning::NumericWarning;

/// A processed height map in physical units.
///
/// Every entry is finite and lies in `[0, max_height_mm]` by construction.
/// `pixel_pitch_mm` is the physical spacing between adjacent grid points;
/// the grid's model-space origin is `(0, 0)` (the solid builder re-anchors
/// it when a border frame is added).
#[derive(Debug, Clone)]
pub struct HeightGrid {
    /// Relief heights above the base plane, in millimeters.
    pub heights: Array2<f64>,
    /// Physical spacing between adjacent grid points, in millimeters.
    pub pixel_pitch_mm: f64,
}

impl HeightGrid {
    /// Number of grid rows.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.heights.nrows()
    }

    /// Number of grid columns.
    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.heights.ncols()
    }

    /// Physical width of the relief content (X extent), in millimeters.
    #[must_use]
    pub fn width_mm(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            (self.cols().saturating_sub(1)) as f64 * self.pixel_pitch_mm
        }
    }

    /// Physical depth of the relief content (Y extent), in millimeters.
    #[must_use]
    pub fn depth_mm(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            (self.rows().saturating_sub(1)) as f64 * self.pixel_pitch_mm
        }
    }

    /// The tallest relief height, in millimeters.
    #[must_use]
    pub fn max_height_mm(&self) -> f64 {
        self.heights
            .iter()
            .copied()
            .fold(0.0_f64, f64::max)
    }
}

/// Linearly map a processed grid onto `[0, max_height_mm]`.
///
/// `z = (v − lo) / (hi − lo) · max_height` where `[lo, hi]` is the grid's
/// value range. A degenerate flat grid (`hi == lo`) maps every sample to
/// `0` instead of dividing by zero; the condition is surfaced as a
/// [`NumericWarning::FlatRange`].
///
/// The pixel pitch is `longest_side_mm / max(rows, cols)` when a target
/// physical size is given, otherwise 1 mm per pixel.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::scale_heights;
///
/// let grid = array![[0.0, 5.0], [10.0, 20.0]];
/// let (heights, warning) = scale_heights(&grid, 8.0, None);
/// assert!(warning.is_none());
/// assert_eq!(heights.heights[[0, 0]], 0.0);
/// assert_eq!(heights.heights[[1, 1]], 8.0);
/// assert_eq!(heights.pixel_pitch_mm, 1.0);
/// ```
#[must_use]
pub fn scale_heights(
    grid: &Array2<f64>,
    max_height_mm: f64,
    longest_side_mm: Option<f64>,
) -> (HeightGrid, Option<NumericWarning>) {
    let (rows, cols) = grid.dim();

    let pixel_pitch_mm = match longest_side_mm {
        Some(target) => {
            #[allow(clippy::cast_precision_loss)]
            let longest_px = rows.max(cols) as f64;
            target / longest_px
        }
        None => 1.0,
    };

    let lo = grid.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;

    if range <= 0.0 || !range.is_finite() {
        warn!(value = lo, "flat value range; relief collapses to the base");
        let heights = Array2::zeros((rows, cols));
        return (
            HeightGrid {
                heights,
                pixel_pitch_mm,
            },
            Some(NumericWarning::FlatRange { value: lo }),
        );
    }

    debug!(lo, hi, max_height_mm, pixel_pitch_mm, "scaling heights");

    let heights = grid.mapv(|v| (v - lo) / range * max_height_mm);
    (
        HeightGrid {
            heights,
            pixel_pitch_mm,
        },
        None,
    )
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn maps_range_exactly_onto_zero_to_max() {
        let grid = array![[2.0, 4.0], [6.0, 10.0]];
        let (out, warning) = scale_heights(&grid, 12.0, None);
        assert!(warning.is_none());
        assert_eq!(out.heights[[0, 0]], 0.0);
        assert_eq!(out.heights[[1, 1]], 12.0);
        assert_eq!(out.heights[[0, 1]], 3.0);
    }

    #[test]
    fn flat_grid_maps_to_zero_with_warning() {
        let grid = Array2::from_elem((3, 4), 5.0);
        let (out, warning) = scale_heights(&grid, 10.0, None);
        assert!(out.heights.iter().all(|&v| v == 0.0));
        assert_eq!(warning, Some(NumericWarning::FlatRange { value: 5.0 }));
    }

    #[test]
    fn pitch_defaults_to_one_mm_per_pixel() {
        let grid = array![[0.0, 1.0]];
        let (out, _) = scale_heights(&grid, 1.0, None);
        assert_eq!(out.pixel_pitch_mm, 1.0);
    }

    #[test]
    fn pitch_follows_longest_side() {
        let grid = Array2::zeros((50, 200));
        let (out, _) = scale_heights(&grid, 1.0, Some(100.0));
        assert_eq!(out.pixel_pitch_mm, 0.5);
    }

    #[test]
    fn physical_extents() {
        let grid = Array2::zeros((3, 5));
        let (out, _) = scale_heights(&grid, 1.0, None);
        assert_eq!(out.width_mm(), 4.0);
        assert_eq!(out.depth_mm(), 2.0);
    }

    #[test]
    fn outputs_are_finite_and_bounded() {
        let grid = array![[1e-300, 1e300], [0.0, -1e300]];
        let (out, _) = scale_heights(&grid, 10.0, None);
        for &v in &out.heights {
            assert!(v.is_finite());
            assert!((0.0..=10.0).contains(&v));
        }
    }
}
