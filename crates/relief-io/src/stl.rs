//! STL export.
//!
//! Writes the finished solid in either binary or ASCII STL. Binary is
//! the default (a relief of a full-frame image runs to millions of
//! facets); ASCII exists for eyeballing small outputs in a text editor.
//!
//! Facet normals are recomputed from the winding at write time rather
//! than stored, so the file always agrees with the geometry.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use relief_types::IndexedMesh;
use tracing::info;

use crate::error::IoResult;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Output flavor for [`write_stl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    /// 50 bytes per facet, little-endian.
    #[default]
    Binary,
    /// Human-readable `facet` / `vertex` text.
    Ascii,
}

/// Write a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// # Example
///
/// ```no_run
/// use relief_io::{write_stl, StlFormat};
/// use relief_types::IndexedMesh;
///
/// let mesh = IndexedMesh::new();
/// write_stl(&mesh, "relief.stl", StlFormat::Binary).unwrap();
/// ```
pub fn write_stl<P: AsRef<Path>>(mesh: &IndexedMesh, path: P, format: StlFormat) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match format {
        StlFormat::Binary => write_stl_binary(mesh, &mut writer)?,
        StlFormat::Ascii => write_stl_ascii(mesh, &mut writer)?,
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        faces = mesh.face_count(),
        ?format,
        "STL written"
    );
    Ok(())
}

fn write_stl_binary<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL written by tactile-relief";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: face counts are bounded by the u32 index space
    let face_count = mesh.faces.len() as u32;
    writer.write_all(&face_count.to_le_bytes())?;

    for &[i0, i1, i2] in &mesh.faces {
        let v0 = &mesh.vertices[i0 as usize].position;
        let v1 = &mesh.vertices[i1 as usize].position;
        let v2 = &mesh.vertices[i2 as usize].position;

        let (nx, ny, nz) = facet_normal(
            (v0.x, v0.y, v0.z),
            (v1.x, v1.y, v1.z),
            (v2.x, v2.y, v2.z),
        );

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: the STL format stores f32 coordinates
        {
            for value in [nx, ny, nz] {
                writer.write_all(&(value as f32).to_le_bytes())?;
            }
            for v in [v0, v1, v2] {
                writer.write_all(&(v.x as f32).to_le_bytes())?;
                writer.write_all(&(v.y as f32).to_le_bytes())?;
                writer.write_all(&(v.z as f32).to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

fn write_stl_ascii<W: Write>(mesh: &IndexedMesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid relief")?;

    for &[i0, i1, i2] in &mesh.faces {
        let v0 = &mesh.vertices[i0 as usize].position;
        let v1 = &mesh.vertices[i1 as usize].position;
        let v2 = &mesh.vertices[i2 as usize].position;

        let (nx, ny, nz) = facet_normal(
            (v0.x, v0.y, v0.z),
            (v1.x, v1.y, v1.z),
            (v2.x, v2.y, v2.z),
        );

        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for v in [v0, v1, v2] {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid relief")?;
    Ok(())
}

/// Unit normal from the winding; zero for degenerate facets.
fn facet_normal(
    a: (f64, f64, f64),
    b: (f64, f64, f64),
    c: (f64, f64, f64),
) -> (f64, f64, f64) {
    let e1 = (b.0 - a.0, b.1 - a.1, b.2 - a.2);
    let e2 = (c.0 - a.0, c.1 - a.1, c.2 - a.2);
    let n = (
        e1.1 * e2.2 - e1.2 * e2.1,
        e1.2 * e2.0 - e1.0 * e2.2,
        e1.0 * e2.1 - e1.1 * e2.0,
    );
    let len = (n.0 * n.0 + n.1 * n.1 + n.2 * n.2).sqrt();
    if len > f64::EPSILON {
        (n.0 / len, n.1 / len, n.2 / len)
    } else {
        (0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use relief_types::Vertex;

    fn upward_triangle() -> IndexedMesh {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 1.0));
        mesh.vertices.push(Vertex::from_coords(2.0, 0.0, 1.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 2.0, 1.0));
        mesh.faces.push([0, 1, 2]);
        mesh
    }

    #[test]
    fn binary_layout_is_exact() {
        let mesh = upward_triangle();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.stl");
        write_stl(&mesh, &path, StlFormat::Binary).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // 80-byte header + 4-byte count + one 50-byte facet.
        assert_eq!(bytes.len(), 134);
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count, 1);

        // Normal of a CCW triangle in the z = 1 plane points up.
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, 1.0);

        // First vertex follows the normal.
        let x = f32::from_le_bytes([bytes[96], bytes[97], bytes[98], bytes[99]]);
        assert_eq!(x, 0.0);

        // Attribute byte count is zero.
        assert_eq!(&bytes[132..134], &[0, 0]);
    }

    #[test]
    fn ascii_output_is_well_formed() {
        let mesh = upward_triangle();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri_ascii.stl");
        write_stl(&mesh, &path, StlFormat::Ascii).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("solid relief"));
        assert!(text.trim_end().ends_with("endsolid relief"));
        assert_eq!(text.matches("facet normal").count(), 1);
        assert_eq!(text.matches("vertex").count(), 3);
    }

    #[test]
    fn empty_mesh_writes_header_only() {
        let mesh = IndexedMesh::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.stl");
        write_stl(&mesh, &path, StlFormat::Binary).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 84);
    }

    #[test]
    fn degenerate_facet_gets_zero_normal() {
        let (nx, ny, nz) = facet_normal((0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (2.0, 2.0, 2.0));
        assert_eq!((nx, ny, nz), (0.0, 0.0, 0.0));
    }
}
