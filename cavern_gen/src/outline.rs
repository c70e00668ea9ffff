// Outline extraction: closed loops of floor vertices along boundary edges.
//
// A boundary edge is an edge owned by exactly one floor triangle (see
// `AdjacencyIndex::is_boundary_edge`). Each outline is an ordered vertex loop
// whose consecutive pairs are boundary edges and whose last entry repeats the
// first.
//
// The walk:
//   1. `visited` starts as a copy of the interior flags, so config-15 corners
//      are never considered, nor are map-rim corners of a sealed grid. On an
//      unsealed grid the rim corners stay eligible and the map edge closes
//      any loop that runs into it.
//   2. Scan vertices in ascending id order. For an unvisited vertex, look for
//      a connected outline vertex: scan its triangles in adjacency order and
//      each triangle's vertices in index order, taking the first one that is
//      not the vertex itself, is unvisited, and forms a boundary edge with it.
//   3. If one exists, mark the start visited and begin the outline with it,
//      then repeatedly append the current vertex, mark it, and step to its
//      connected outline vertex until there is none. Finally append the start
//      again to close the loop.
//
// Step 3 is a plain loop. The walk is strictly linear (each step has at most
// one successor), so no stack is needed and large caves cannot overflow one.
//
// **Critical constraint: determinism.** Start order, adjacency order and
// triangle vertex order are all fixed by the triangulator, so the outline set
// and each outline's direction are reproducible.
//
// See also: `mesh.rs` for the adjacency index, `wall_mesh.rs` which extrudes
// each outline.

use serde::{Deserialize, Serialize};

use crate::mesh::{AdjacencyIndex, MeshData};

/// One closed loop of floor vertex ids; `vertices.first() == vertices.last()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub vertices: Vec<u32>,
}

impl Outline {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 2 && self.vertices.first() == self.vertices.last()
    }

    /// Consecutive vertex pairs, i.e. the boundary edges of the loop.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.vertices.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Extract every outline of `floor`.
///
/// `interior` flags vertices that can never be on an outline; it may be
/// shorter than the vertex count, missing entries count as not interior.
pub fn extract_outlines(
    floor: &MeshData,
    adjacency: &AdjacencyIndex,
    interior: &[bool],
) -> Vec<Outline> {
    let mut walker = OutlineWalker {
        floor,
        adjacency,
        visited: interior.to_vec(),
    };
    walker.visited.resize(floor.vertex_count(), false);

    let mut outlines = Vec::new();
    for start in 0..floor.vertex_count() as u32 {
        if walker.visited[start as usize] {
            continue;
        }
        let Some(first) = walker.connected_outline_vertex(start) else {
            continue;
        };
        walker.visited[start as usize] = true;
        let mut vertices = vec![start];

        let mut current = Some(first);
        while let Some(vertex) = current {
            vertices.push(vertex);
            walker.visited[vertex as usize] = true;
            current = walker.connected_outline_vertex(vertex);
        }
        vertices.push(start);
        outlines.push(Outline { vertices });
    }

    log::debug!(
        "extracted {} outlines ({} boundary edges)",
        outlines.len(),
        outlines.iter().map(|o| o.len() - 1).sum::<usize>()
    );
    outlines
}

struct OutlineWalker<'a> {
    floor: &'a MeshData,
    adjacency: &'a AdjacencyIndex,
    visited: Vec<bool>,
}

impl OutlineWalker<'_> {
    /// First unvisited vertex sharing a boundary edge with `vertex`.
    fn connected_outline_vertex(&self, vertex: u32) -> Option<u32> {
        self.adjacency
            .triangles_of(vertex)
            .iter()
            .flat_map(|&t| self.floor.triangle(t))
            .find(|&other| {
                other != vertex
                    && !self.visited[other as usize]
                    && self.adjacency.is_boundary_edge(self.floor, vertex, other)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellState, Grid};
    use crate::square_grid::SquareGrid;
    use crate::triangulate::triangulate;

    fn outlines_of(grid: &Grid) -> (MeshData, Vec<Outline>) {
        let mut sq = SquareGrid::build(grid, 1.0);
        let tri = triangulate(&mut sq);
        let outlines = extract_outlines(&tri.floor, &tri.adjacency, &tri.interior);
        (tri.floor, outlines)
    }

    /// Two triangles sharing a diagonal, no interior flags.
    fn square() -> (MeshData, AdjacencyIndex) {
        let mut mesh = MeshData::default();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]] {
            mesh.push_vertex(p);
        }
        let mut adjacency = AdjacencyIndex::default();
        for tri in [[0, 1, 2], [0, 2, 3]] {
            let id = mesh.push_triangle(tri);
            adjacency.register(id, tri);
        }
        (mesh, adjacency)
    }

    #[test]
    fn square_perimeter_is_one_loop_in_walk_order() {
        let (mesh, adjacency) = square();
        let outlines = extract_outlines(&mesh, &adjacency, &[]);
        // From 0: triangle 0 offers 1 first (0-1 is a boundary edge). From 1
        // the only unvisited boundary neighbor is 2, then 3.
        assert_eq!(outlines, vec![Outline { vertices: vec![0, 1, 2, 3, 0] }]);
    }

    #[test]
    fn interior_vertices_are_skipped() {
        let (mesh, adjacency) = square();
        let outlines = extract_outlines(&mesh, &adjacency, &[true, true, true, true]);
        assert!(outlines.is_empty());
    }

    #[test]
    fn solid_grid_has_no_outlines() {
        let (_, outlines) = outlines_of(&Grid::new(4, 4, CellState::Filled));
        assert!(outlines.is_empty());
    }

    #[test]
    fn open_grid_has_no_outlines() {
        let (floor, outlines) = outlines_of(&Grid::new(4, 4, CellState::Empty));
        assert_eq!(floor.vertex_count(), 0);
        assert!(outlines.is_empty());
    }

    #[test]
    fn ring_grid_has_one_loop_around_the_hole() {
        let (floor, outlines) = outlines_of(&Grid::new_walled(5, 5, CellState::Empty));
        assert_eq!(outlines.len(), 1);
        let outline = &outlines[0];
        assert!(outline.is_closed());
        assert_eq!(outline.len(), 13);

        let mut unique = outline.vertices[..12].to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 12);

        // Cell centers sit at -2..=2, the open cells at -1..=1. Every loop
        // vertex is a midpoint between a ring cell and an open cell.
        for &v in &outline.vertices {
            let [x, _, z] = floor.position(v);
            let on_x = (x.abs() - 1.5).abs() < 1e-5 && z.abs() <= 1.0 + 1e-5;
            let on_z = (z.abs() - 1.5).abs() < 1e-5 && x.abs() <= 1.0 + 1e-5;
            assert!(on_x || on_z, "vertex {v} at ({x}, {z})");
        }
    }

    #[test]
    fn every_outline_edge_is_a_boundary_edge() {
        let mut grid = Grid::new_walled(9, 7, CellState::Empty);
        grid.set(4, 3, CellState::Filled);
        grid.set(2, 2, CellState::Filled);
        grid.set(3, 3, CellState::Filled);
        let mut sq = SquareGrid::build(&grid, 1.0);
        let tri = triangulate(&mut sq);
        let outlines = extract_outlines(&tri.floor, &tri.adjacency, &tri.interior);
        assert!(outlines.len() >= 2, "hole outline plus pillar outlines");
        for outline in &outlines {
            assert!(outline.is_closed());
            assert!(outline.len() >= 4);
            for (a, b) in outline.edges() {
                assert!(tri.adjacency.is_boundary_edge(&tri.floor, a, b), "{a}-{b}");
            }
        }
    }

    #[test]
    fn no_vertex_appears_in_two_outlines() {
        let mut grid = Grid::new_walled(10, 10, CellState::Empty);
        grid.set(3, 3, CellState::Filled);
        grid.set(6, 6, CellState::Filled);
        let (_, outlines) = outlines_of(&grid);
        assert_eq!(outlines.len(), 3);
        let mut seen = Vec::new();
        for outline in &outlines {
            seen.extend_from_slice(&outline.vertices[1..]);
        }
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
