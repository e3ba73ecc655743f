//! Unified error type for a pipeline run.

use thiserror::Error;

use crate::config::ConfigError;
use relief_grid::DataError;
use relief_solid::GeometryError;

/// Result type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Any failure of a pipeline run, by stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration was rejected before any processing.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The sample grid could not be processed.
    #[error("unusable input data: {0}")]
    Data(#[from] DataError),

    /// The processed heights could not form a solid.
    #[error("solid construction failed: {0}")]
    Geometry(#[from] GeometryError),
}
