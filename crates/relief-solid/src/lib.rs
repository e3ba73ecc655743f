//! Heightfield-to-solid geometry engine for tactile-relief.
//!
//! Turns a processed [`HeightGrid`](relief_grid::HeightGrid) into a single
//! closed, watertight, consistently-wound triangle solid ready for 3D
//! printing:
//!
//! - a relief **top surface** (two triangles per grid cell, fixed diagonal),
//! - **side walls** closing the perimeter down to the base plane,
//! - an optional raised **border frame** surrounding the relief,
//! - a flat **bottom** at `z = 0`.
//!
//! The builder works arena-style: vertices live in a flat buffer and
//! triangles reference them by index, so coincident boundary vertices are
//! welded by construction and every seam is shared exactly.
//!
//! [`validate_solid`] performs the edge-sharing census used by the tests
//! (and available to callers) to prove watertightness and orientation.
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use relief_grid::HeightGrid;
//! use relief_solid::{build_solid, SolidParams};
//!
//! let grid = HeightGrid {
//!     heights: array![[0.0, 1.0], [0.0, 1.0]],
//!     pixel_pitch_mm: 1.0,
//! };
//! let params = SolidParams::default().with_base_thickness(1.0);
//! let mesh = build_solid(&grid, &params).unwrap();
//!
//! // A 1x1 mm footprint under a planar ramp from 1 to 2 mm.
//! assert!((mesh.signed_volume() - 1.5).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod error;
mod heightfield;
mod validate;

pub use adjacency::EdgeAdjacency;
pub use error::{GeometryError, GeometryResult};
pub use heightfield::{build_solid, SolidParams};
pub use validate::{validate_solid, SolidReport};
