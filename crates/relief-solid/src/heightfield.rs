//! Closed-solid construction from a height grid.

// Grid dimensions are far below 2^52, so usize -> f64 is exact here.
#![allow(clippy::cast_precision_loss)]
// Welding compares z values for exact equality on purpose: only vertices
// that truly coincide may share an index.
#![allow(clippy::float_cmp)]

use relief_grid::HeightGrid;
use relief_types::{IndexedMesh, Vertex};
use tracing::{debug, info};

use crate::error::{GeometryError, GeometryResult};

/// Parameters for the supporting geometry around the relief surface.
///
/// All values in millimeters. A border is present when
/// `border_width_mm > 0`; its flat top sits at
/// `base_thickness_mm + border_height_mm`, independent of the relief
/// amplitude.
///
/// # Example
///
/// ```
/// use relief_solid::SolidParams;
///
/// let params = SolidParams::default()
///     .with_base_thickness(2.0)
///     .with_border(5.0, 3.0);
/// assert_eq!(params.border_width_mm, 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct SolidParams {
    /// Thickness of the base slab below the relief.
    pub base_thickness_mm: f64,
    /// Width of the border frame; `0` disables the border.
    pub border_width_mm: f64,
    /// Height of the border frame above the base plate (`0` = flat flange).
    pub border_height_mm: f64,
}

impl Default for SolidParams {
    fn default() -> Self {
        Self {
            base_thickness_mm: 2.0,
            border_width_mm: 0.0,
            border_height_mm: 0.0,
        }
    }
}

impl SolidParams {
    /// Set the base slab thickness.
    #[must_use]
    pub const fn with_base_thickness(mut self, mm: f64) -> Self {
        self.base_thickness_mm = mm;
        self
    }

    /// Enable a border frame with the given width and height.
    #[must_use]
    pub const fn with_border(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.border_width_mm = width_mm;
        self.border_height_mm = height_mm;
        self
    }
}

/// Build a closed, watertight solid from a height grid.
///
/// The solid consists of the relief top surface, vertical walls, an
/// optional border frame and a flat bottom at `z = 0`. Faces are wound
/// counter-clockwise viewed from outside, so the mesh has a positive
/// signed volume.
///
/// Grid cells with identical corner heights still produce two valid
/// triangles (the supporting vertices differ in x/y). Boundary vertices
/// whose z coincides across adjacent parts (relief touching the border
/// top, or a wall of zero height) are welded by index, so no zero-area
/// triangle is ever emitted.
///
/// # Errors
///
/// - [`GeometryError::DegenerateFootprint`] for grids smaller than 2×2
/// - [`GeometryError::InvalidPitch`] for a non-positive or non-finite pitch
/// - [`GeometryError::ZeroHeight`] when base, relief and border are all
///   flat at `z = 0` (nothing to print)
pub fn build_solid(grid: &HeightGrid, params: &SolidParams) -> GeometryResult<IndexedMesh> {
    let (rows, cols) = grid.heights.dim();
    if rows < 2 || cols < 2 {
        return Err(GeometryError::DegenerateFootprint { rows, cols });
    }

    let pitch = grid.pixel_pitch_mm;
    if !pitch.is_finite() || pitch <= 0.0 {
        return Err(GeometryError::InvalidPitch(pitch));
    }

    let base = params.base_thickness_mm;
    let border = params.border_width_mm > 0.0;
    let bw = if border { params.border_width_mm } else { 0.0 };
    let border_z = base + params.border_height_mm;

    let peak = grid.heights.iter().copied().fold(0.0_f64, f64::max);
    let top_z = (base + peak).max(if border { border_z } else { 0.0 });
    if top_z <= 0.0 {
        return Err(GeometryError::ZeroHeight);
    }

    let p_count = 2 * (rows - 1) + 2 * (cols - 1);
    let cells = (rows - 1) * (cols - 1);
    let mut mesh =
        IndexedMesh::with_capacity(rows * cols + 3 * p_count + 1, 2 * cells + 7 * p_count);

    let content_w = (cols - 1) as f64 * pitch;
    let content_h = (rows - 1) as f64 * pitch;

    // Relief top surface. The relief is offset inward by the border
    // width so the outer footprint starts at the origin.
    let mut top_idx = vec![0u32; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            let x = bw + j as f64 * pitch;
            let y = bw + i as f64 * pitch;
            let z = base + grid.heights[[i, j]];
            top_idx[i * cols + j] = mesh.add_vertex(Vertex::from_coords(x, y, z));
        }
    }
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let v00 = top_idx[i * cols + j];
            let v10 = top_idx[i * cols + j + 1];
            let v01 = top_idx[(i + 1) * cols + j];
            let v11 = top_idx[(i + 1) * cols + j + 1];
            // Fixed v00 -> v11 diagonal; the split never flips between cells.
            mesh.faces.push([v00, v10, v11]);
            mesh.faces.push([v00, v11, v01]);
        }
    }

    // Grid boundary loop, counter-clockwise seen from +Z. The top
    // surface traverses these edges in loop order, so every piece
    // stitched below must traverse them in reverse.
    let loop_rc = perimeter(rows, cols);
    let loop_top: Vec<u32> = loop_rc.iter().map(|&(i, j)| top_idx[i * cols + j]).collect();

    // The loop the outer walls hang from: either the relief boundary or
    // the border frame's outer edge.
    let (wall_top, wall_xy) = if border {
        // Border inner ring at frame height, sharing x/y with the relief
        // boundary so the seam is a single vertical loop.
        let inner_ring: Vec<u32> = loop_rc
            .iter()
            .map(|&(i, j)| {
                let t = top_idx[i * cols + j];
                if mesh.vertices[t as usize].position.z == border_z {
                    t
                } else {
                    let x = bw + j as f64 * pitch;
                    let y = bw + i as f64 * pitch;
                    mesh.add_vertex(Vertex::from_coords(x, y, border_z))
                }
            })
            .collect();

        for k in 0..p_count {
            let k1 = (k + 1) % p_count;
            push_quad(&mut mesh, loop_top[k], inner_ring[k], inner_ring[k1], loop_top[k1]);
        }

        // Frame top annulus: each boundary point pushed straight out to
        // the offset footprint (corners move diagonally).
        let outer_xy: Vec<(f64, f64)> = loop_rc
            .iter()
            .map(|&(i, j)| {
                let x = bw + j as f64 * pitch;
                let y = bw + i as f64 * pitch;
                let ox = if j == 0 {
                    x - bw
                } else if j == cols - 1 {
                    x + bw
                } else {
                    x
                };
                let oy = if i == 0 {
                    y - bw
                } else if i == rows - 1 {
                    y + bw
                } else {
                    y
                };
                (ox, oy)
            })
            .collect();
        let outer_ring: Vec<u32> = outer_xy
            .iter()
            .map(|&(x, y)| mesh.add_vertex(Vertex::from_coords(x, y, border_z)))
            .collect();

        for k in 0..p_count {
            let k1 = (k + 1) % p_count;
            push_quad(&mut mesh, inner_ring[k], outer_ring[k], outer_ring[k1], inner_ring[k1]);
        }

        debug!(
            width_mm = params.border_width_mm,
            top_z = border_z,
            "border frame added"
        );

        (outer_ring, outer_xy)
    } else {
        let xy: Vec<(f64, f64)> = loop_rc
            .iter()
            .map(|&(i, j)| (j as f64 * pitch, i as f64 * pitch))
            .collect();
        (loop_top, xy)
    };

    // Outer walls down to the base plane, welded where the top already
    // touches z = 0.
    let bottom_ring: Vec<u32> = wall_top
        .iter()
        .zip(wall_xy.iter())
        .map(|(&t, &(x, y))| {
            if mesh.vertices[t as usize].position.z == 0.0 {
                t
            } else {
                mesh.add_vertex(Vertex::from_coords(x, y, 0.0))
            }
        })
        .collect();
    for k in 0..p_count {
        let k1 = (k + 1) % p_count;
        push_quad(&mut mesh, wall_top[k], bottom_ring[k], bottom_ring[k1], wall_top[k1]);
    }

    // Bottom fan over the footprint perimeter, wound to face -Z.
    let center = mesh.add_vertex(Vertex::from_coords(
        bw + content_w / 2.0,
        bw + content_h / 2.0,
        0.0,
    ));
    for k in 0..p_count {
        let k1 = (k + 1) % p_count;
        mesh.faces.push([center, bottom_ring[k1], bottom_ring[k]]);
    }

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        footprint_w_mm = content_w + 2.0 * bw,
        footprint_h_mm = content_h + 2.0 * bw,
        top_z_mm = top_z,
        "solid built"
    );

    Ok(mesh)
}

/// Boundary cells of an `(rows, cols)` grid in counter-clockwise order
/// (seen from +Z), starting at `(0, 0)`.
fn perimeter(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(2 * (rows - 1) + 2 * (cols - 1));
    for j in 0..cols - 1 {
        out.push((0, j));
    }
    for i in 0..rows - 1 {
        out.push((i, cols - 1));
    }
    for j in (1..cols).rev() {
        out.push((rows - 1, j));
    }
    for i in (1..rows).rev() {
        out.push((i, 0));
    }
    out
}

/// Append the two triangles of a quad `a-b-c-d`, skipping any triangle
/// that references a vertex twice (an edge collapsed by welding).
fn push_quad(mesh: &mut IndexedMesh, a: u32, b: u32, c: u32, d: u32) {
    if a != b && b != c && c != a {
        mesh.faces.push([a, b, c]);
    }
    if a != c && c != d && d != a {
        mesh.faces.push([a, c, d]);
    }
}
