//! Resampling: block-average downsampling and Gaussian smoothing.

use ndarray::Array2;
use tracing::debug;

/// Gaussian kernel truncation radius, in standard deviations.
///
/// The kernel covers `±3σ`; the truncated tails carry less than 0.3% of
/// the total mass.
pub const GAUSSIAN_TRUNCATION_SIGMAS: f64 = 3.0;

/// Downsample a grid by block-averaging `factor × factor` neighborhoods.
///
/// An `(R, C)` grid becomes `(⌈R/f⌉, ⌈C/f⌉)`. Partial blocks at the
/// bottom/right border average only the samples that exist. `factor = 1`
/// is the identity.
///
/// # Panics
///
/// Panics if `factor` is zero; the pipeline validates the configuration
/// before any stage runs.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::downsample;
///
/// let grid = array![
///     [0.0, 2.0, 4.0],
///     [4.0, 6.0, 8.0],
/// ];
/// let half = downsample(&grid, 2);
/// assert_eq!(half.dim(), (1, 2));
/// assert_eq!(half[[0, 0]], 3.0); // mean of 0, 2, 4, 6
/// assert_eq!(half[[0, 1]], 6.0); // mean of 4, 8 (partial block)
/// ```
#[must_use]
pub fn downsample(grid: &Array2<f64>, factor: usize) -> Array2<f64> {
    assert!(factor >= 1, "downsample factor must be at least 1");
    if factor == 1 {
        return grid.clone();
    }

    let (rows, cols) = grid.dim();
    let out_rows = rows.div_ceil(factor);
    let out_cols = cols.div_ceil(factor);

    debug!(factor, out_rows, out_cols, "block-average downsampling");

    Array2::from_shape_fn((out_rows, out_cols), |(bi, bj)| {
        let r0 = bi * factor;
        let c0 = bj * factor;
        let r1 = (r0 + factor).min(rows);
        let c1 = (c0 + factor).min(cols);

        let mut sum = 0.0;
        for i in r0..r1 {
            for j in c0..c1 {
                sum += grid[[i, j]];
            }
        }
        #[allow(clippy::cast_precision_loss)]
        {
            sum / ((r1 - r0) * (c1 - c0)) as f64
        }
    })
}

/// Build the half-kernel weights `w[0..=radius]` for a Gaussian of the
/// given sigma, truncated at [`GAUSSIAN_TRUNCATION_SIGMAS`].
fn gaussian_half_kernel(sigma: f64) -> Vec<f64> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // sigma is validated non-negative and finite upstream
    let radius = (sigma * GAUSSIAN_TRUNCATION_SIGMAS).ceil() as usize;
    let denom = 2.0 * sigma * sigma;
    (0..=radius)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let d = i as f64;
            (-d * d / denom).exp()
        })
        .collect()
}

/// Apply an isotropic Gaussian blur with standard deviation `sigma`
/// (in grid units).
///
/// The filter is separable: one horizontal pass, one vertical pass. The
/// kernel is truncated at `±3σ` and, at the grid edges, renormalized over
/// the in-bounds taps — an explicit, reproducible policy instead of an
/// implicit reflect/nearest border mode. `sigma = 0` is the identity.
///
/// Smoothing runs after downsampling so the blur radius is expressed on
/// the coarser grid.
#[must_use]
pub fn gaussian_smooth(grid: &Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 {
        return grid.clone();
    }

    let half = gaussian_half_kernel(sigma);
    let radius = half.len() - 1;
    let (rows, cols) = grid.dim();

    debug!(sigma, radius, "gaussian smoothing");

    // Horizontal pass
    let mut tmp = Array2::zeros((rows, cols));
    for i in 0..rows {
        for j in 0..cols {
            let lo = j.saturating_sub(radius);
            let hi = (j + radius).min(cols - 1);
            let mut acc = 0.0;
            let mut weight = 0.0;
            for k in lo..=hi {
                let w = half[k.abs_diff(j)];
                acc += w * grid[[i, k]];
                weight += w;
            }
            tmp[[i, j]] = acc / weight;
        }
    }

    // Vertical pass
    let mut out = Array2::zeros((rows, cols));
    for j in 0..cols {
        for i in 0..rows {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(rows - 1);
            let mut acc = 0.0;
            let mut weight = 0.0;
            for k in lo..=hi {
                let w = half[k.abs_diff(i)];
                acc += w * tmp[[k, j]];
                weight += w;
            }
            out[[i, j]] = acc / weight;
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn downsample_identity_factor() {
        let grid = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(downsample(&grid, 1), grid);
    }

    #[test]
    fn downsample_shape_is_ceiling_division() {
        for (rows, cols, f) in [(7usize, 5usize, 2usize), (9, 9, 3), (4, 10, 4), (5, 5, 7)] {
            let grid = Array2::zeros((rows, cols));
            let out = downsample(&grid, f);
            assert_eq!(out.dim(), (rows.div_ceil(f), cols.div_ceil(f)));
        }
    }

    #[test]
    fn downsample_averages_blocks() {
        let grid = array![
            [1.0, 1.0, 5.0],
            [1.0, 1.0, 5.0],
            [9.0, 9.0, 3.0],
        ];
        let out = downsample(&grid, 2);
        assert_eq!(out[[0, 0]], 1.0);
        assert_eq!(out[[0, 1]], 5.0);
        assert_eq!(out[[1, 0]], 9.0);
        assert_eq!(out[[1, 1]], 3.0);
    }

    #[test]
    fn downsample_preserves_constant_grids() {
        let grid = Array2::from_elem((10, 7), 2.5);
        let out = downsample(&grid, 3);
        assert!(out.iter().all(|&v| (v - 2.5).abs() < 1e-12));
    }

    #[test]
    fn smooth_zero_sigma_is_identity() {
        let grid = array![[1.0, 2.0], [3.0, 4.0]];
        assert_eq!(gaussian_smooth(&grid, 0.0), grid);
    }

    #[test]
    fn smooth_preserves_constant_grids() {
        // Renormalized edge handling keeps flat fields exactly flat.
        let grid = Array2::from_elem((9, 9), 3.0);
        let out = gaussian_smooth(&grid, 1.5);
        for &v in &out {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn smooth_reduces_peak_amplitude() {
        let mut grid = Array2::zeros((11, 11));
        grid[[5, 5]] = 100.0;
        let out = gaussian_smooth(&grid, 1.0);
        assert!(out[[5, 5]] < 50.0);
        assert!(out[[5, 5]] > out[[5, 4]]);
        assert!(out[[5, 4]] > 0.0);
    }

    #[test]
    fn smooth_is_symmetric_around_a_peak() {
        let mut grid = Array2::zeros((9, 9));
        grid[[4, 4]] = 1.0;
        let out = gaussian_smooth(&grid, 1.0);
        assert!((out[[4, 2]] - out[[4, 6]]).abs() < 1e-12);
        assert!((out[[2, 4]] - out[[6, 4]]).abs() < 1e-12);
        assert!((out[[4, 2]] - out[[2, 4]]).abs() < 1e-12);
    }

    #[test]
    fn kernel_radius_tracks_sigma() {
        assert_eq!(gaussian_half_kernel(1.0).len(), 4); // radius 3
        assert_eq!(gaussian_half_kernel(0.5).len(), 3); // radius 2
    }
}
