//! Directed edge census over a triangle soup.

use hashbrown::HashMap;

/// How often an undirected edge is used in each direction.
///
/// In a closed solid with consistent counter-clockwise winding every
/// edge is traversed exactly once in each direction by its two incident
/// triangles. Any imbalance points at a hole, a flipped face or a
/// non-manifold fin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeUse {
    /// Traversals from the lower to the higher vertex index.
    pub forward: u32,
    /// Traversals from the higher to the lower vertex index.
    pub backward: u32,
}

impl EdgeUse {
    /// Total number of incident triangles.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.forward + self.backward
    }

    /// Whether the edge is matched: one use in each direction.
    #[must_use]
    pub const fn is_matched(self) -> bool {
        self.forward == 1 && self.backward == 1
    }
}

/// Edge adjacency for a face list, keyed by undirected edge with the
/// traversal direction kept separate.
///
/// # Example
///
/// ```
/// use relief_solid::EdgeAdjacency;
///
/// // Two triangles sharing edge (1, 2) with opposite traversal.
/// let adj = EdgeAdjacency::build(&[[0, 1, 2], [1, 3, 2]]);
/// assert_eq!(adj.boundary_edge_count(), 4);
/// assert!(!adj.is_watertight());
/// ```
#[derive(Debug, Clone)]
pub struct EdgeAdjacency {
    edges: HashMap<(u32, u32), EdgeUse>,
}

impl EdgeAdjacency {
    /// Tally every directed edge of every face.
    #[must_use]
    pub fn build(faces: &[[u32; 3]]) -> Self {
        let mut edges: HashMap<(u32, u32), EdgeUse> = HashMap::new();
        for face in faces {
            for (a, b) in [
                (face[0], face[1]),
                (face[1], face[2]),
                (face[2], face[0]),
            ] {
                let entry = if a < b {
                    edges.entry((a, b)).or_default()
                } else {
                    edges.entry((b, a)).or_default()
                };
                if a < b {
                    entry.forward += 1;
                } else {
                    entry.backward += 1;
                }
            }
        }
        Self { edges }
    }

    /// Usage counts for an edge, in either vertex order.
    #[must_use]
    pub fn uses(&self, v0: u32, v1: u32) -> Option<EdgeUse> {
        let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
        self.edges.get(&key).copied()
    }

    /// Number of distinct undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges with exactly one incident triangle (hole boundary).
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edges
            .iter()
            .filter(|(_, uses)| uses.total() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Count of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edges.values().filter(|u| u.total() == 1).count()
    }

    /// Count of edges with more than two incident triangles.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edges.values().filter(|u| u.total() > 2).count()
    }

    /// Count of two-triangle edges traversed twice in the same direction
    /// (one of the faces is wound backwards).
    #[must_use]
    pub fn misoriented_edge_count(&self) -> usize {
        self.edges
            .values()
            .filter(|u| u.total() == 2 && !u.is_matched())
            .count()
    }

    /// Every edge has exactly two incident triangles.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edges.values().all(|u| u.total() == 2)
    }

    /// Every edge is traversed once in each direction.
    #[must_use]
    pub fn is_consistently_wound(&self) -> bool {
        self.edges.values().all(|u| u.is_matched())
    }
}
