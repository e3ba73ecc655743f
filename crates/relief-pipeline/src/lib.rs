//! Pipeline orchestration for tactile-relief.
//!
//! Composes the [`relief_grid`] processing stages and the
//! [`relief_solid`] builder into a single [`run`] call driven by a
//! validated [`ReliefConfig`]. Warnings from the numeric stages are
//! collected into the output instead of being lost in the logs.
//!
//! Input loading and STL export live in `relief-io`; this crate only
//! sees a grid of samples and produces a validated solid.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod error;
mod pipeline;

pub use config::{ConfigError, ReliefConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{run, PipelineOutput};
