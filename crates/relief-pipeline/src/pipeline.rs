//! Stage orchestration: sample grid in, validated solid out.

use relief_grid::{
    clip, downsample, gaussian_smooth, invert, log_compress, sanitize, scale_heights,
    NumericWarning, SampleGrid,
};
use relief_solid::{build_solid, validate_solid, SolidParams, SolidReport};
use relief_types::IndexedMesh;
use tracing::{debug, info};

use crate::config::ReliefConfig;
use crate::error::PipelineResult;

/// Everything a run produces besides log output.
#[derive(Debug)]
pub struct PipelineOutput {
    /// The watertight solid, ready for export.
    pub mesh: IndexedMesh,
    /// Structural census of the solid.
    pub report: SolidReport,
    /// Non-fatal numeric conditions encountered along the way.
    pub warnings: Vec<NumericWarning>,
}

/// Run the full processing pipeline over a sample grid.
///
/// Stages run in a fixed order: sanitize, clip, invert, log-compress,
/// downsample, smooth, scale, build. Inversion happens before the log
/// so faint detail is expanded on the side that ends up raised.
///
/// # Errors
///
/// Fails fast on an invalid configuration, then on unusable input data
/// (for example an all-NaN grid), then on degenerate geometry (a grid
/// too small after downsampling, or a solid with no height at all).
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_pipeline::{run, ReliefConfig};
///
/// let grid = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]];
/// let config = ReliefConfig {
///     clip_percent: 0.0,
///     max_height_mm: 10.0,
///     base_thickness_mm: 2.0,
///     ..Default::default()
/// };
/// let output = run(&grid, &config).unwrap();
/// assert!(output.report.is_printable());
/// assert!(output.warnings.is_empty());
/// ```
pub fn run(grid: &SampleGrid, config: &ReliefConfig) -> PipelineResult<PipelineOutput> {
    config.validate()?;

    let mut warnings = Vec::new();

    let (mut data, warning) = sanitize(grid, config.clip_percent, config.nan_replacement)?;
    if let Some(w) = warning {
        warnings.push(w);
    }

    if config.clip_percent > 0.0 {
        data = clip(&data, config.clip_percent);
    }
    if config.invert {
        data = invert(&data);
    }
    if config.log_scale {
        data = log_compress(&data);
    }
    if config.downsample_factor > 1 {
        data = downsample(&data, config.downsample_factor);
    }
    if let Some(sigma) = config.smooth_sigma {
        data = gaussian_smooth(&data, sigma);
    }

    debug!(
        rows = data.nrows(),
        cols = data.ncols(),
        "grid processing complete"
    );

    let (heights, warning) = scale_heights(&data, config.max_height_mm, config.longest_side_mm);
    if let Some(w) = warning {
        warnings.push(w);
    }

    let params = SolidParams::default()
        .with_base_thickness(config.base_thickness_mm)
        .with_border(config.border_width_mm, config.border_height_mm);
    let mesh = build_solid(&heights, &params)?;
    let report = validate_solid(&mesh);

    info!(
        faces = report.face_count,
        volume_mm3 = report.signed_volume,
        warnings = warnings.len(),
        "pipeline run complete"
    );

    Ok(PipelineOutput {
        mesh,
        report,
        warnings,
    })
}
