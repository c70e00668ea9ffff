// Mesh buffers and the vertex → triangle adjacency index.
//
// `MeshData` is the hand-off format for the host renderer: a vertex position
// buffer and a flat triangle index buffer (3 indices per triangle). Triangle
// `t` occupies `indices[3t..3t + 3]`, and that position is the triangle's id
// everywhere else in the crate.
//
// `AdjacencyIndex` records, for each vertex, the ids of the triangles that
// reference it. The triangulator fills it as it emits triangles; the outline
// extractor and the wall builder use it to find boundary edges (edges owned
// by exactly one triangle) and the triangle owning each such edge.
//
// See also: `triangulate.rs` which builds both, `outline.rs` and
// `wall_mesh.rs` which consume them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions; the index into this buffer is the vertex id.
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its id.
    pub fn push_vertex(&mut self, position: [f32; 3]) -> u32 {
        self.positions.push(position);
        (self.positions.len() - 1) as u32
    }

    /// Append a triangle and return its id.
    pub fn push_triangle(&mut self, triangle: [u32; 3]) -> u32 {
        let id = self.triangle_count() as u32;
        self.indices.extend_from_slice(&triangle);
        id
    }

    /// The three vertex ids of triangle `id`.
    pub fn triangle(&self, id: u32) -> [u32; 3] {
        let base = id as usize * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn position(&self, vertex: u32) -> [f32; 3] {
        self.positions[vertex as usize]
    }

    /// Unnormalized face normal of triangle `id` by the right-hand rule
    /// (`(b - a) × (c - a)`).
    pub fn face_normal(&self, id: u32) -> [f32; 3] {
        let [a, b, c] = self.triangle(id).map(|v| self.position(v));
        let u = sub(b, a);
        let w = sub(c, a);
        [
            u[1] * w[2] - u[2] * w[1],
            u[2] * w[0] - u[0] * w[2],
            u[0] * w[1] - u[1] * w[0],
        ]
    }
}

pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Triangles touching one vertex. A vertex of the floor mesh is shared by at
/// most four quads, and no quad fans more than four triangles through it.
pub type TriangleList = SmallVec<[u32; 8]>;

/// Per-vertex list of the triangles that reference it.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    by_vertex: Vec<TriangleList>,
}

impl AdjacencyIndex {
    /// Register triangle `id` under each of its three vertices.
    pub fn register(&mut self, id: u32, triangle: [u32; 3]) {
        for vertex in triangle {
            let slot = vertex as usize;
            if slot >= self.by_vertex.len() {
                self.by_vertex.resize_with(slot + 1, TriangleList::new);
            }
            self.by_vertex[slot].push(id);
        }
    }

    /// Triangles referencing `vertex` (empty for unknown vertices).
    pub fn triangles_of(&self, vertex: u32) -> &[u32] {
        self.by_vertex
            .get(vertex as usize)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Triangles that contain both `a` and `b`.
    pub fn shared_triangles<'a>(
        &'a self,
        mesh: &'a MeshData,
        a: u32,
        b: u32,
    ) -> impl Iterator<Item = u32> + 'a {
        self.triangles_of(a)
            .iter()
            .copied()
            .filter(move |&t| mesh.triangle(t).contains(&b))
    }

    /// An edge is a boundary edge iff exactly one triangle contains both
    /// endpoints. Zero (not an edge) and two or more (interior) are not.
    pub fn is_boundary_edge(&self, mesh: &MeshData, a: u32, b: u32) -> bool {
        let mut shared = self.shared_triangles(mesh, a, b);
        shared.next().is_some() && shared.next().is_none()
    }
}
