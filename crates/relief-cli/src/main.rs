//! `fits2stl`: convert a FITS image into a 3D-printable tactile relief.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use relief_io::{read_fits_image, write_stl, StlFormat};
use relief_pipeline::{run, ReliefConfig};

#[derive(Parser, Debug)]
#[command(
    name = "fits2stl",
    version,
    about = "Convert a FITS image into a 3D-printable tactile relief (STL)"
)]
struct Args {
    /// Input FITS file
    input: PathBuf,

    /// Output STL file (defaults to the input name with .stl)
    output: Option<PathBuf>,

    /// 0-based index of the HDU holding the image
    #[arg(long, default_value_t = 0)]
    hdu: usize,

    /// Symmetric percentile clip in percent (0 disables)
    #[arg(long, default_value_t = 1.0)]
    clip: f64,

    /// Replace NaN/Inf samples with this value instead of the clipped minimum
    #[arg(long)]
    nan_value: Option<f64>,

    /// Print dark areas raised instead of bright ones
    #[arg(long)]
    invert: bool,

    /// Compress the dynamic range logarithmically
    #[arg(long)]
    log_scale: bool,

    /// Gaussian smoothing sigma in pixels
    #[arg(long)]
    smooth: Option<f64>,

    /// Block-average downsampling factor
    #[arg(long, default_value_t = 1)]
    downsample: usize,

    /// Relief height above the base, in mm
    #[arg(long, default_value_t = 20.0)]
    max_height: f64,

    /// Base slab thickness, in mm
    #[arg(long, default_value_t = 5.0)]
    base_thickness: f64,

    /// Physical length of the longer image side, in mm
    #[arg(long)]
    longest_side: Option<f64>,

    /// Border frame width, in mm (0 disables the border)
    #[arg(long, default_value_t = 0.0)]
    border_width: f64,

    /// Border frame height above the base, in mm
    #[arg(long, default_value_t = 0.0)]
    border_height: f64,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,
}

impl Args {
    fn config(&self) -> ReliefConfig {
        ReliefConfig {
            hdu_index: self.hdu,
            clip_percent: self.clip,
            nan_replacement: self.nan_value,
            invert: self.invert,
            log_scale: self.log_scale,
            smooth_sigma: self.smooth,
            downsample_factor: self.downsample,
            max_height_mm: self.max_height,
            base_thickness_mm: self.base_thickness,
            longest_side_mm: self.longest_side,
            border_width_mm: self.border_width,
            border_height_mm: self.border_height,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();

    let grid = read_fits_image(&args.input, config.hdu_index)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let output = run(&grid, &config).context("processing image")?;
    for warning in &output.warnings {
        warn!("{warning}");
    }

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("stl"));
    let format = if args.ascii {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    };
    write_stl(&output.mesh, &out_path, format)
        .with_context(|| format!("writing {}", out_path.display()))?;

    let bounds = output.mesh.bounds();
    let size = bounds.size();
    println!("{}", output.report);
    println!(
        "model: {:.1} x {:.1} x {:.1} mm",
        size.x, size.y, size.z
    );
    println!("wrote {}", out_path.display());

    Ok(())
}
