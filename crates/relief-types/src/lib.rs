//! Core mesh types for tactile-relief.
//!
//! This crate provides the vocabulary shared by the relief solid builder
//! and the mesh writers:
//!
//! - [`Vertex`] - A point of the solid in model space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! All coordinates are `f64` millimeters. The relief pipeline produces
//! solids whose base plane sits at `z = 0`.
//!
//! # Coordinate System
//!
//! Right-handed: X maps to image columns, Y to image rows, Z is height.
//! Face winding is **counter-clockwise (CCW) when viewed from outside**;
//! normals point outward by the right-hand rule.
//!
//! # Example
//!
//! ```
//! use relief_types::{IndexedMesh, Vertex, Point3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::IndexedMesh;
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
