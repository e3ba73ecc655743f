//! Vertex type.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex of a relief solid.
///
/// Relief solids carry no per-vertex attributes; a vertex is a bare
/// position in model space (millimeters).
///
/// # Example
///
/// ```
/// use relief_types::{Vertex, Point3};
///
/// let v = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// assert_eq!(v.position.z, 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position in model space (mm).
    pub position: Point3<f64>,
}

impl Vertex {
    /// Create a vertex from a position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a vertex from raw coordinates.
    ///
    /// # Example
    ///
    /// ```
    /// use relief_types::Vertex;
    ///
    /// let v = Vertex::from_coords(0.0, 1.0, 2.0);
    /// assert_eq!(v.position.y, 1.0);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_coords_matches_new() {
        let a = Vertex::from_coords(1.0, 2.0, 3.0);
        let b = Vertex::new(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(a, b);
    }
}
