//! Percentile computation and symmetric range clipping.

use ndarray::Array2;
use tracing::debug;

/// Compute the `p`-th percentile of a set of values.
///
/// Uses linear interpolation between order statistics: the percentile is
/// taken at fractional rank `p / 100 * (n - 1)` of the sorted values.
/// This matches the most common "linear" convention and is deterministic
/// across platforms.
///
/// Non-finite inputs are ignored. Returns `None` when no finite value
/// remains or when `p` is outside `[0, 100]`.
///
/// # Example
///
/// ```
/// use relief_grid::percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile(&values, 0.0), Some(1.0));
/// assert_eq!(percentile(&values, 100.0), Some(4.0));
/// assert_eq!(percentile(&values, 50.0), Some(2.5));
/// ```
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);

    let n = finite.len();
    if n == 1 {
        return Some(finite[0]);
    }

    #[allow(clippy::cast_precision_loss)]
    let rank = p / 100.0 * (n - 1) as f64;
    let lo = rank.floor();
    let frac = rank - lo;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // rank is within [0, n-1] by construction
    let lo_idx = lo as usize;
    let hi_idx = (lo_idx + 1).min(n - 1);

    Some(finite[lo_idx] + frac * (finite[hi_idx] - finite[lo_idx]))
}

/// Clip a grid into its symmetric percentile range.
///
/// Computes the `percent`-th and `(100 - percent)`-th percentiles of the
/// finite values and clamps every sample into that interval. This tames
/// hot pixels and deep dropouts before height normalization.
///
/// `percent = 0` is the identity. The bounds can coincide on a flat
/// image; clipping then produces a constant grid, which the height
/// scaler handles without dividing by zero.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::clip;
///
/// let grid = array![[0.0, 2.0], [4.0, 8.0]];
/// let clipped = clip(&grid, 25.0);
/// assert_eq!(clipped[[0, 0]], 1.5); // raised to the 25th percentile
/// assert_eq!(clipped[[1, 1]], 5.0); // capped at the 75th percentile
/// ```
#[must_use]
pub fn clip(grid: &Array2<f64>, percent: f64) -> Array2<f64> {
    if percent <= 0.0 {
        return grid.clone();
    }

    let values: Vec<f64> = grid.iter().copied().collect();
    let (Some(lower), Some(upper)) = (
        percentile(&values, percent),
        percentile(&values, 100.0 - percent),
    ) else {
        return grid.clone();
    };

    debug!(percent, lower, upper, "clipping sample range");

    grid.mapv(|v| v.clamp(lower, upper))
}

#[cfg(test)]
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn percentile_endpoints() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(3.0));
        assert_eq!(percentile(&values, 50.0), Some(2.0));
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [0.0, 10.0];
        assert_eq!(percentile(&values, 25.0), Some(2.5));
        assert_eq!(percentile(&values, 75.0), Some(7.5));
    }

    #[test]
    fn percentile_ignores_non_finite() {
        let values = [f64::NAN, 1.0, f64::INFINITY, 3.0];
        assert_eq!(percentile(&values, 50.0), Some(2.0));
    }

    #[test]
    fn percentile_empty_is_none() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[f64::NAN], 50.0), None);
    }

    #[test]
    fn percentile_rejects_out_of_range_p() {
        assert_eq!(percentile(&[1.0], -1.0), None);
        assert_eq!(percentile(&[1.0], 101.0), None);
    }

    #[test]
    fn clip_zero_percent_is_identity() {
        let grid =
            Array2::from_shape_fn((4, 4), |(i, j)| (i * 4 + j) as f64);
        let clipped = clip(&grid, 0.0);
        assert_eq!(grid, clipped);
    }

    #[test]
    fn clip_bounds_the_range() {
        let grid = Array2::from_shape_fn((10, 10), |(i, j)| (i * 10 + j) as f64);
        let clipped = clip(&grid, 5.0);

        let lower = percentile(&grid.iter().copied().collect::<Vec<_>>(), 5.0)
            .unwrap_or(f64::NAN);
        let upper = percentile(&grid.iter().copied().collect::<Vec<_>>(), 95.0)
            .unwrap_or(f64::NAN);

        let min = clipped.iter().copied().fold(f64::INFINITY, f64::min);
        let max = clipped.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(min >= lower);
        assert!(max <= upper);
    }

    #[test]
    fn clip_extremes_equal_the_percentile_bounds() {
        // The clamp bounds are the interpolated percentiles themselves;
        // interpolation may round (here 100 + 0.7 * 900 lands just above
        // 730), so the comparison must be against the percentile, not a
        // hand-computed decimal.
        let grid = array![[0.0, 50.0], [100.0, 1000.0]];
        let clipped = clip(&grid, 10.0);

        let values: Vec<f64> = grid.iter().copied().collect();
        let upper = percentile(&values, 90.0).unwrap_or(f64::NAN);
        let lower = percentile(&values, 10.0).unwrap_or(f64::NAN);
        let max = clipped.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = clipped.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(max, upper);
        assert_eq!(min, lower);
        assert!(max > 730.0);
    }

    #[test]
    fn clip_flat_grid_stays_flat() {
        let grid = Array2::from_elem((3, 3), 7.0);
        let clipped = clip(&grid, 1.0);
        assert!(clipped.iter().all(|&v| (v - 7.0).abs() < 1e-12));
    }

    #[test]
    fn clipped_fraction_is_roughly_symmetric() {
        // 1000 distinct values, clip at 10%: about 100 pinned at each end.
        let grid = Array2::from_shape_fn((20, 50), |(i, j)| (i * 50 + j) as f64);
        let clipped = clip(&grid, 10.0);

        let min = clipped.iter().copied().fold(f64::INFINITY, f64::min);
        let max = clipped.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let at_min = clipped.iter().filter(|&&v| (v - min).abs() < 1e-9).count();
        let at_max = clipped.iter().filter(|&&v| (v - max).abs() < 1e-9).count();

        assert!((90..=110).contains(&at_min), "pinned low: {at_min}");
        assert!((90..=110).contains(&at_max), "pinned high: {at_max}");
    }
}
