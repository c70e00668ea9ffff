// Wall extrusion: one vertical quad per outline edge.
//
// For each consecutive pair (a, b) of an outline, four fresh vertices are
// appended: the two floor positions A and B, then the same two shifted down by
// `wall_height` (walls hang from the floor level toward -Y). The quad is split
// into two triangles. Wall vertices are never shared between quads, so every
// wall face gets flat shading from its own normals.
//
// Winding. With local indices 0 = A, 1 = B, 2 = A', 3 = B', the base winding
// `(0, 2, 3), (3, 1, 0)` has normal `h · (-dz, 0, dx)` where `(dx, dz)` is
// B - A. The floor triangle owning the edge lies on one side of it; if its
// third vertex is on the side the normal points to, the winding is flipped to
// `(0, 3, 2), (3, 0, 1)`. Walls therefore face away from the floor they bound,
// whichever direction the outline walk took.
//
// See also: `outline.rs` for the loops, `mesh.rs` for the adjacency index.

use crate::mesh::{AdjacencyIndex, MeshData, sub};
use crate::outline::Outline;

const BASE_WINDING: [[u32; 3]; 2] = [[0, 2, 3], [3, 1, 0]];
const FLIPPED_WINDING: [[u32; 3]; 2] = [[0, 3, 2], [3, 0, 1]];

/// Build the wall mesh for `outlines` over `floor`.
pub fn build_wall_mesh(
    outlines: &[Outline],
    floor: &MeshData,
    adjacency: &AdjacencyIndex,
    wall_height: f32,
) -> MeshData {
    let edge_count: usize = outlines.iter().map(|o| o.len().saturating_sub(1)).sum();
    let mut walls = MeshData {
        positions: Vec::with_capacity(edge_count * 4),
        indices: Vec::with_capacity(edge_count * 6),
    };

    for outline in outlines {
        for (a, b) in outline.edges() {
            let top_a = floor.position(a);
            let top_b = floor.position(b);
            let drop = |p: [f32; 3]| [p[0], p[1] - wall_height, p[2]];

            let base = walls.push_vertex(top_a);
            walls.push_vertex(top_b);
            walls.push_vertex(drop(top_a));
            walls.push_vertex(drop(top_b));

            let winding = if floor_on_normal_side(floor, adjacency, a, b) {
                FLIPPED_WINDING
            } else {
                BASE_WINDING
            };
            for local in winding {
                walls.push_triangle(local.map(|i| base + i));
            }
        }
    }

    log::debug!(
        "extruded {} wall quads ({} triangles)",
        edge_count,
        walls.triangle_count()
    );
    walls
}

/// Whether the floor triangle owning edge (a, b) lies on the side the base
/// winding's normal points to.
fn floor_on_normal_side(floor: &MeshData, adjacency: &AdjacencyIndex, a: u32, b: u32) -> bool {
    let Some(owner) = adjacency.shared_triangles(floor, a, b).next() else {
        return false;
    };
    let Some(third) = floor.triangle(owner).into_iter().find(|&v| v != a && v != b) else {
        return false;
    };
    let edge = sub(floor.position(b), floor.position(a));
    let toward = sub(floor.position(third), floor.position(a));
    let normal_xz = [-edge[2], edge[0]];
    normal_xz[0] * toward[0] + normal_xz[1] * toward[2] > 0.0
}
