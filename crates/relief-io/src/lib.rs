//! File I/O for tactile-relief: FITS in, STL out.
//!
//! [`read_fits_image`] pulls a 2D image HDU out of a FITS file as a
//! sample grid; [`write_stl`] exports the finished solid in binary or
//! ASCII STL. Both ends keep the error surface explicit so the CLI can
//! tell a missing file from a malformed one from a wrong HDU index.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod fits;
mod stl;

pub use error::{IoError, IoResult};
pub use fits::read_fits_image;
pub use stl::{write_stl, StlFormat};
