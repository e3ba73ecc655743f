//! Run configuration and eager validation.

use thiserror::Error;

/// Errors raised by [`ReliefConfig::validate`] before any data is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `max_height_mm` must be positive and finite.
    #[error("max relief height must be positive and finite, got {0} mm")]
    InvalidMaxHeight(f64),

    /// `base_thickness_mm` must be non-negative and finite.
    #[error("base thickness must be non-negative and finite, got {0} mm")]
    InvalidBaseThickness(f64),

    /// `clip_percent` must lie in `[0, 50)`.
    #[error("clip percentage must be in [0, 50), got {0}")]
    InvalidClipPercent(f64),

    /// `smooth_sigma` must be positive and finite when set.
    #[error("smoothing sigma must be positive and finite, got {0}")]
    InvalidSmoothSigma(f64),

    /// `downsample_factor` must be at least 1.
    #[error("downsample factor must be at least 1, got {0}")]
    InvalidDownsampleFactor(usize),

    /// `longest_side_mm` must be positive and finite when set.
    #[error("longest side must be positive and finite, got {0} mm")]
    InvalidLongestSide(f64),

    /// Border width and height must be non-negative and finite.
    #[error("border dimensions must be non-negative and finite, got {width} x {height} mm")]
    InvalidBorder {
        /// Requested border width.
        width: f64,
        /// Requested border height.
        height: f64,
    },

    /// `nan_replacement` must be finite when set.
    #[error("NaN replacement value must be finite, got {0}")]
    InvalidNanReplacement(f64),
}

/// Full configuration of a relief run.
///
/// Construct with [`ReliefConfig::default`] and adjust fields; call
/// [`validate`](Self::validate) (the pipeline does this itself) before
/// processing. Defaults produce a 20 mm relief on a 5 mm base at 1 mm
/// per pixel, with 1% percentile clipping and no tone mapping.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReliefConfig {
    /// Which HDU of the input file holds the image (0-based).
    pub hdu_index: usize,

    /// Symmetric percentile clip applied to the value range, in percent.
    /// `0` disables clipping.
    pub clip_percent: f64,
    /// Replacement for NaN/Inf samples; `None` falls back to the clipped
    /// minimum of the finite samples.
    pub nan_replacement: Option<f64>,
    /// Flip the brightness axis so dark areas print raised.
    pub invert: bool,
    /// Apply logarithmic compression after the optional inversion.
    pub log_scale: bool,
    /// Gaussian smoothing sigma in pixels; `None` disables smoothing.
    pub smooth_sigma: Option<f64>,
    /// Block-average downsampling factor; `1` keeps full resolution.
    pub downsample_factor: usize,

    /// Height of the tallest relief feature above the base, in millimeters.
    pub max_height_mm: f64,
    /// Thickness of the base slab, in millimeters.
    pub base_thickness_mm: f64,
    /// Physical length of the longer image side; `None` means 1 mm per
    /// pixel.
    pub longest_side_mm: Option<f64>,

    /// Width of the raised border frame; `0` disables the border.
    pub border_width_mm: f64,
    /// Height of the border frame above the base plate.
    pub border_height_mm: f64,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            hdu_index: 0,
            clip_percent: 1.0,
            nan_replacement: None,
            invert: false,
            log_scale: false,
            smooth_sigma: None,
            downsample_factor: 1,
            max_height_mm: 20.0,
            base_thickness_mm: 5.0,
            longest_side_mm: None,
            border_width_mm: 0.0,
            border_height_mm: 0.0,
        }
    }
}

impl ReliefConfig {
    /// Check every parameter before any data is read.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_height_mm.is_finite() || self.max_height_mm <= 0.0 {
            return Err(ConfigError::InvalidMaxHeight(self.max_height_mm));
        }
        if !self.base_thickness_mm.is_finite() || self.base_thickness_mm < 0.0 {
            return Err(ConfigError::InvalidBaseThickness(self.base_thickness_mm));
        }
        if !self.clip_percent.is_finite() || !(0.0..50.0).contains(&self.clip_percent) {
            return Err(ConfigError::InvalidClipPercent(self.clip_percent));
        }
        if let Some(sigma) = self.smooth_sigma {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(ConfigError::InvalidSmoothSigma(sigma));
            }
        }
        if self.downsample_factor == 0 {
            return Err(ConfigError::InvalidDownsampleFactor(0));
        }
        if let Some(side) = self.longest_side_mm {
            if !side.is_finite() || side <= 0.0 {
                return Err(ConfigError::InvalidLongestSide(side));
            }
        }
        if !self.border_width_mm.is_finite()
            || self.border_width_mm < 0.0
            || !self.border_height_mm.is_finite()
            || self.border_height_mm < 0.0
        {
            return Err(ConfigError::InvalidBorder {
                width: self.border_width_mm,
                height: self.border_height_mm,
            });
        }
        if let Some(value) = self.nan_replacement {
            if !value.is_finite() {
                return Err(ConfigError::InvalidNanReplacement(value));
            }
        }
        Ok(())
    }
}
