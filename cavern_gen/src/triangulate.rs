// Marching-squares triangulation of the floor.
//
// Each quad's 4-bit config selects a fixed, ordered list of `QuadPoint`s from
// `CASE_TABLE` (0, 3, 4, 5 or 6 points). The points are fan-triangulated as
// `(p0, pi, pi+1)`, so an n-point polygon yields n - 2 triangles. The table
// orders every polygon top-left → top-right → bottom-right → bottom-left
// around the quad, which with Z as "up" on the page gives triangles whose
// right-hand normal is +Y.
//
// Vertex ids are assigned the first time a node is referenced: its position
// is appended to the floor buffer and the id is stored on the node, so later
// quads that touch the same corner or edge midpoint reuse it. Every emitted
// triangle is registered in the `AdjacencyIndex` under its three vertices.
//
// Interior marking: the 4 corner vertices of a config-15 quad lie strictly
// inside solid wall and cannot be on an outline. When the grid's outer ring
// is sealed, map-rim corners are marked too: a closed ring has no open side
// to wall off, so it must never become an outline. An unsealed grid marks no
// rim corners, and the map edge then closes each boundary loop that reaches
// it.
//
// **Critical constraint: determinism.** Quads are visited in x-major order
// and points in table order, so vertex and triangle ids depend only on the
// grid.
//
// See also: `square_grid.rs` for the lattice, `outline.rs` which consumes the
// interior flags and adjacency.

use crate::mesh::{AdjacencyIndex, MeshData};
use crate::square_grid::{NodeId, Quad, SquareGrid};

/// One of the 8 lattice points a quad can contribute to the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuadPoint {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CenterTop,
    CenterRight,
    CenterBottom,
    CenterLeft,
}

impl QuadPoint {
    fn node(self, quad: &Quad) -> NodeId {
        match self {
            QuadPoint::TopLeft => quad.top_left,
            QuadPoint::TopRight => quad.top_right,
            QuadPoint::BottomRight => quad.bottom_right,
            QuadPoint::BottomLeft => quad.bottom_left,
            QuadPoint::CenterTop => quad.center_top,
            QuadPoint::CenterRight => quad.center_right,
            QuadPoint::CenterBottom => quad.center_bottom,
            QuadPoint::CenterLeft => quad.center_left,
        }
    }
}

use QuadPoint::*;

/// Polygon for every config, indexed by the config value.
pub const CASE_TABLE: [&[QuadPoint]; 16] = [
    // 0: nothing solid.
    &[],
    // Single corner.
    &[CenterLeft, CenterBottom, BottomLeft],
    &[BottomRight, CenterBottom, CenterRight],
    // 3
    &[CenterRight, BottomRight, BottomLeft, CenterLeft],
    &[TopRight, CenterRight, CenterTop],
    // 5: diagonal pair, the saddle is filled.
    &[CenterTop, TopRight, CenterRight, CenterBottom, BottomLeft, CenterLeft],
    &[CenterTop, TopRight, BottomRight, CenterBottom],
    &[CenterTop, TopRight, BottomRight, BottomLeft, CenterLeft],
    &[TopLeft, CenterTop, CenterLeft],
    &[TopLeft, CenterTop, CenterBottom, BottomLeft],
    // 10: diagonal pair.
    &[TopLeft, CenterTop, CenterRight, BottomRight, CenterBottom, CenterLeft],
    &[TopLeft, CenterTop, CenterRight, BottomRight, BottomLeft],
    &[TopLeft, TopRight, CenterRight, CenterLeft],
    &[TopLeft, TopRight, CenterRight, CenterBottom, BottomLeft],
    &[TopLeft, TopRight, BottomRight, CenterBottom, CenterLeft],
    // 15: fully solid.
    &[TopLeft, TopRight, BottomRight, BottomLeft],
];

/// Floor mesh plus the bookkeeping the outline pass needs.
#[derive(Clone, Debug, Default)]
pub struct Triangulation {
    pub floor: MeshData,
    pub adjacency: AdjacencyIndex,
    /// Per floor vertex: known not to lie on any outline.
    pub interior: Vec<bool>,
}

/// Triangulate every quad of `grid`, assigning vertex ids on its nodes.
pub fn triangulate(grid: &mut SquareGrid) -> Triangulation {
    let mut out = Triangulation::default();
    let quads = grid.quads().to_vec();
    let mark_rim = grid.rim_sealed();
    let mut points = Vec::with_capacity(6);

    for quad in &quads {
        let polygon = CASE_TABLE[usize::from(quad.config & 0xF)];
        if polygon.is_empty() {
            continue;
        }

        points.clear();
        for &point in polygon {
            let vertex = vertex_for(grid, &mut out, point.node(quad), mark_rim);
            points.push(vertex);
        }

        if quad.config == 15 {
            for vertex in &points {
                out.interior[*vertex as usize] = true;
            }
        }

        for i in 1..points.len() - 1 {
            let triangle = [points[0], points[i], points[i + 1]];
            let id = out.floor.push_triangle(triangle);
            out.adjacency.register(id, triangle);
        }
    }

    log::debug!(
        "triangulated {} quads: {} vertices, {} triangles",
        quads.len(),
        out.floor.vertex_count(),
        out.floor.triangle_count()
    );
    out
}

/// The node's vertex id, assigning the next id on first use.
fn vertex_for(
    grid: &mut SquareGrid,
    out: &mut Triangulation,
    id: NodeId,
    mark_rim: bool,
) -> u32 {
    let node = grid.node_mut(id);
    if let Some(vertex) = node.vertex {
        return vertex;
    }
    let vertex = out.floor.push_vertex(node.position);
    out.interior.push(mark_rim && node.is_rim());
    node.vertex = Some(vertex);
    vertex
}
