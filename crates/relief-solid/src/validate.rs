//! Printability checks for a built solid.

use relief_types::IndexedMesh;
use tracing::debug;

use crate::adjacency::EdgeAdjacency;

/// Area below which a triangle counts as degenerate.
const DEGENERATE_AREA: f64 = 1e-12;

/// Structural summary of a solid.
///
/// Produced by [`validate_solid`]; the builder's own tests lean on it,
/// and callers can print it after a run to confirm the output is safe to
/// slice.
#[derive(Debug, Clone, Default)]
pub struct SolidReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of faces.
    pub face_count: usize,
    /// Total number of undirected edges.
    pub edge_count: usize,

    /// Edges with a single incident triangle.
    pub boundary_edge_count: usize,
    /// Edges with more than two incident triangles.
    pub non_manifold_edge_count: usize,
    /// Two-triangle edges traversed twice in the same direction.
    pub misoriented_edge_count: usize,
    /// Triangles with (near) zero area.
    pub degenerate_face_count: usize,

    /// Signed enclosed volume, cubic millimeters.
    pub signed_volume: f64,

    /// No boundary edges and no non-manifold edges.
    pub is_watertight: bool,
    /// Every edge traversed once in each direction.
    pub is_consistently_wound: bool,
}

impl SolidReport {
    /// Whether the solid can go straight to a slicer: closed, manifold,
    /// consistently wound outward and free of degenerate faces.
    #[must_use]
    pub fn is_printable(&self) -> bool {
        self.is_watertight
            && self.is_consistently_wound
            && self.signed_volume > 0.0
            && self.degenerate_face_count == 0
    }
}

impl std::fmt::Display for SolidReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "solid: {} vertices, {} faces, {} edges",
            self.vertex_count, self.face_count, self.edge_count
        )?;
        writeln!(f, "  volume: {:.3} mm^3", self.signed_volume)?;
        writeln!(
            f,
            "  watertight: {}   wound outward: {}",
            if self.is_watertight { "yes" } else { "no" },
            if self.is_consistently_wound && self.signed_volume > 0.0 {
                "yes"
            } else {
                "no"
            }
        )?;
        if self.boundary_edge_count > 0 {
            writeln!(f, "  boundary edges: {}", self.boundary_edge_count)?;
        }
        if self.non_manifold_edge_count > 0 {
            writeln!(f, "  non-manifold edges: {}", self.non_manifold_edge_count)?;
        }
        if self.misoriented_edge_count > 0 {
            writeln!(f, "  misoriented edges: {}", self.misoriented_edge_count)?;
        }
        if self.degenerate_face_count > 0 {
            writeln!(f, "  degenerate faces: {}", self.degenerate_face_count)?;
        }
        Ok(())
    }
}

/// Run the full structural census over a solid.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use relief_grid::HeightGrid;
/// use relief_solid::{build_solid, validate_solid, SolidParams};
///
/// let grid = HeightGrid {
///     heights: array![[0.0, 1.0], [1.0, 0.0]],
///     pixel_pitch_mm: 1.0,
/// };
/// let mesh = build_solid(&grid, &SolidParams::default()).unwrap();
/// let report = validate_solid(&mesh);
/// assert!(report.is_printable());
/// ```
#[must_use]
pub fn validate_solid(mesh: &IndexedMesh) -> SolidReport {
    let adjacency = EdgeAdjacency::build(&mesh.faces);

    let degenerate_face_count = mesh
        .triangles()
        .filter(|tri| tri.is_degenerate(DEGENERATE_AREA))
        .count();

    let report = SolidReport {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        edge_count: adjacency.edge_count(),
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        misoriented_edge_count: adjacency.misoriented_edge_count(),
        degenerate_face_count,
        signed_volume: mesh.signed_volume(),
        is_watertight: adjacency.is_watertight(),
        is_consistently_wound: adjacency.is_consistently_wound(),
    };

    debug!(
        watertight = report.is_watertight,
        wound = report.is_consistently_wound,
        volume = report.signed_volume,
        "solid validated"
    );

    report
}
