//! Non-finite sample replacement.

use ndarray::Array2;
use tracing::warn;

use crate::clip::percentile;
use crate::error::{DataError, DataResult};
use crate::warning::NumericWarning;

/// Replace every non-finite sample (NaN, ±Inf) with a deterministic fallback.
///
/// The fallback policy keeps injected values from ever becoming the
/// brightest point of the relief:
///
/// - if `replacement` is given, it is used verbatim;
/// - otherwise, if clipping is enabled downstream (`clip_percent > 0`),
///   the fallback is the `clip_percent`-th percentile of the finite
///   values — the minimum the grid will have *after* clipping;
/// - otherwise the fallback is the finite minimum.
///
/// An all-finite grid is returned unchanged (bit-identical).
///
/// # Errors
///
/// Returns [`DataError::NoUsableSamples`] if the grid has no finite values
/// and no explicit `replacement`, and [`DataError::EmptyGrid`] for a grid
/// with a zero-sized axis.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::sanitize;
///
/// let grid = array![[1.0, f64::NAN], [3.0, 4.0]];
/// let (clean, warning) = sanitize(&grid, 0.0, None).unwrap();
/// assert_eq!(clean[[0, 1]], 1.0); // finite minimum
/// assert!(warning.is_some());
/// ```
pub fn sanitize(
    grid: &Array2<f64>,
    clip_percent: f64,
    replacement: Option<f64>,
) -> DataResult<(Array2<f64>, Option<NumericWarning>)> {
    let (rows, cols) = grid.dim();
    if rows == 0 || cols == 0 {
        return Err(DataError::EmptyGrid { rows, cols });
    }

    let count = grid.iter().filter(|v| !v.is_finite()).count();
    if count == 0 {
        return Ok((grid.clone(), None));
    }

    let fallback = match replacement {
        Some(value) => value,
        None => {
            let finite: Vec<f64> = grid.iter().copied().filter(|v| v.is_finite()).collect();
            if finite.is_empty() {
                return Err(DataError::NoUsableSamples);
            }
            if clip_percent > 0.0 {
                percentile(&finite, clip_percent).ok_or(DataError::NoUsableSamples)?
            } else {
                finite.iter().copied().fold(f64::INFINITY, f64::min)
            }
        }
    };

    warn!(count, fallback, "replacing non-finite samples");

    let clean = grid.mapv(|v| if v.is_finite() { v } else { fallback });
    Ok((clean, Some(NumericWarning::NonFiniteReplaced { count, fallback })))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn all_finite_grid_is_unchanged() {
        let grid = array![[1.0, 2.0], [3.0, 4.0]];
        let (clean, warning) = match sanitize(&grid, 1.0, None) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(grid, clean);
        assert!(warning.is_none());
    }

    #[test]
    fn nan_and_inf_are_replaced() {
        let grid = array![
            [f64::NAN, 2.0],
            [f64::INFINITY, f64::NEG_INFINITY],
            [3.0, 4.0]
        ];
        let (clean, warning) = match sanitize(&grid, 0.0, None) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(clean.iter().all(|v| v.is_finite()));
        assert_eq!(
            warning,
            Some(NumericWarning::NonFiniteReplaced {
                count: 3,
                fallback: 2.0
            })
        );
    }

    #[test]
    fn fallback_uses_post_clip_minimum() {
        // 100 finite values 0..99 plus one NaN; with 10% clipping the
        // fallback must be the 10th percentile, not the raw minimum.
        let mut grid = Array2::from_shape_fn((1, 101), |(_, j)| {
            #[allow(clippy::cast_precision_loss)]
            {
                j as f64
            }
        });
        grid[[0, 100]] = f64::NAN;

        let (clean, _) = match sanitize(&grid, 10.0, None) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        let fallback = clean[[0, 100]];
        assert!((fallback - 9.9).abs() < 1e-9, "fallback was {fallback}");
    }

    #[test]
    fn explicit_replacement_wins() {
        let grid = array![[f64::NAN, 1.0]];
        let (clean, _) = match sanitize(&grid, 5.0, Some(-1.0)) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(clean[[0, 0]], -1.0);
    }

    #[test]
    fn all_nan_grid_fails() {
        let grid = Array2::from_elem((2, 2), f64::NAN);
        assert!(matches!(
            sanitize(&grid, 1.0, None),
            Err(DataError::NoUsableSamples)
        ));
    }

    #[test]
    fn all_nan_with_replacement_succeeds() {
        let grid = Array2::from_elem((2, 2), f64::NAN);
        let (clean, _) = match sanitize(&grid, 1.0, Some(0.0)) {
            Ok(r) => r,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert!(clean.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_grid_fails() {
        let grid = Array2::<f64>::zeros((0, 4));
        assert!(matches!(
            sanitize(&grid, 0.0, None),
            Err(DataError::EmptyGrid { rows: 0, cols: 4 })
        ));
    }
}
