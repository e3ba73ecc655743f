//! Tone mapping: inversion and logarithmic compression.

use ndarray::Array2;
use tracing::debug;

/// Compression constant `K` for [`log_compress`].
///
/// The stretch is `ln(1 + K·t)` for `t ∈ [0, 1]`; `K = 1000` is a standard
/// astronomical display stretch, strong enough that faint structure near
/// the sky floor gains tactile relief without flattening bright cores.
pub const LOG_COMPRESSION: f64 = 1000.0;

/// Invert a grid: `x → (max − x) + min`.
///
/// Bright becomes low, so craters instead of peaks. The value range is
/// preserved, and applying the inversion twice reproduces the input up to
/// floating-point rounding. When combined with [`log_compress`], inversion
/// is applied first so "invert" always means "bright becomes low" in the
/// final heights.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::invert;
///
/// let grid = array![[0.0, 1.0], [2.0, 3.0]];
/// let flipped = invert(&grid);
/// assert_eq!(flipped[[0, 0]], 3.0);
/// assert_eq!(flipped[[1, 1]], 0.0);
/// ```
#[must_use]
pub fn invert(grid: &Array2<f64>) -> Array2<f64> {
    let min = grid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return grid.clone();
    }
    grid.mapv(|v| (max - v) + min)
}

/// Apply logarithmic dynamic-range compression.
///
/// Maps each sample through `ln(1 + K·(x − min)/(max − min))` with
/// `K =` [`LOG_COMPRESSION`]. The transform is strictly monotonic, so
/// brightness ordering survives while the dynamic range shrinks and
/// faint features gain visible relief.
///
/// A flat grid (max == min) passes through unchanged; the height scaler
/// handles that case explicitly.
#[must_use]
pub fn log_compress(grid: &Array2<f64>) -> Array2<f64> {
    let min = grid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = grid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return grid.clone();
    }

    debug!(min, max, k = LOG_COMPRESSION, "applying log compression");

    grid.mapv(|v| ((v - min) / range).mul_add(LOG_COMPRESSION, 1.0).ln())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn invert_twice_round_trips() {
        let grid = Array2::from_shape_fn((8, 8), |(i, j)| {
            #[allow(clippy::cast_precision_loss)]
            {
                (i as f64).mul_add(0.7, j as f64 * 1.3) + 5.0
            }
        });
        let back = invert(&invert(&grid));
        for (a, b) in grid.iter().zip(back.iter()) {
            assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0));
        }
    }

    #[test]
    fn invert_preserves_range() {
        let grid = array![[1.0, 5.0], [3.0, 2.0]];
        let flipped = invert(&grid);
        let min = flipped.iter().copied().fold(f64::INFINITY, f64::min);
        let max = flipped.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 1.0);
        assert_eq!(max, 5.0);
    }

    #[test]
    fn log_compress_is_monotonic() {
        let grid = array![[0.0, 1.0, 10.0, 100.0, 1000.0]];
        let mapped = log_compress(&grid);
        let row: Vec<f64> = mapped.iter().copied().collect();
        for pair in row.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn log_compress_expands_faint_contrast() {
        // The gap between the two faintest samples should grow relative
        // to the gap between the two brightest ones.
        let grid = array![[0.0, 10.0, 990.0, 1000.0]];
        let mapped = log_compress(&grid);
        let faint_gap = mapped[[0, 1]] - mapped[[0, 0]];
        let bright_gap = mapped[[0, 3]] - mapped[[0, 2]];
        assert!(faint_gap > bright_gap * 10.0);
    }

    #[test]
    fn log_compress_flat_grid_is_identity() {
        let grid = Array2::from_elem((3, 3), 42.0);
        assert_eq!(log_compress(&grid), grid);
    }

    #[test]
    fn log_compress_minimum_maps_to_zero() {
        let grid = array![[2.0, 4.0]];
        let mapped = log_compress(&grid);
        assert!(mapped[[0, 0]].abs() < 1e-12);
    }
}
