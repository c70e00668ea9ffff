// Marching-squares lattice built from a finished cell grid.
//
// Every grid cell becomes a corner node at the cell's center. Between two
// adjacent corners sits an edge node at the segment midpoint. Every 2×2 block
// of corners forms a `Quad`, which references its 4 corners and its 4 edge
// midpoints and carries a 4-bit `config` (one bit per active corner) that
// selects the triangulation case.
//
// Nodes live in one arena (`Vec<Node>`) addressed by `NodeId`. Corners are
// allocated first, one per cell, in x-major order. Edge nodes are allocated
// lazily through `EdgeArena`, keyed by `(x, z, axis)` of the corner they
// extend from: the node to the `Right` of corner (x, z) is the same node as
// the one to the left of (x+1, z), and the node `Above` (x, z) is the one
// below (x, z+1). Two neighboring quads therefore always hold the same id
// for their shared edge, which is what lets the triangulator emit a single
// vertex there. The builder only ever looks up-or-creates; it cannot
// allocate a second node for an edge.
//
// Each node carries its lazily-assigned vertex id (`None` until the
// triangulator first references it).
//
// Coordinates: X grows right, Z grows "up" (top of a quad is +Z), Y is the
// up axis of the floor plane (all nodes sit at y = 0). The lattice is
// centered on the origin.
//
// See also: `grid.rs` for the input grid, `triangulate.rs` which assigns
// vertex ids and emits triangles per quad.

use crate::grid::{CellState, Grid};

/// Handle into the node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Direction an edge node extends from its owning corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeAxis {
    /// Toward the corner at x + 1.
    Right,
    /// Toward the corner at z + 1.
    Above,
}

/// What a node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A grid cell center.
    Corner {
        /// The cell is a wall (`Filled`).
        active: bool,
        state: CellState,
        /// The cell is on the map's outer ring.
        rim: bool,
    },
    /// Midpoint between two adjacent corners.
    Edge,
}

/// A lattice node: position, kind, and its vertex id once assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub position: [f32; 3],
    pub kind: NodeKind,
    pub vertex: Option<u32>,
}

impl Node {
    pub fn is_active(&self) -> bool {
        matches!(self.kind, NodeKind::Corner { active: true, .. })
    }

    pub fn is_rim(&self) -> bool {
        matches!(self.kind, NodeKind::Corner { rim: true, .. })
    }
}

/// Corner bit weights in `Quad::config`.
pub const TOP_LEFT_BIT: u8 = 8;
pub const TOP_RIGHT_BIT: u8 = 4;
pub const BOTTOM_RIGHT_BIT: u8 = 2;
pub const BOTTOM_LEFT_BIT: u8 = 1;

/// One 2×2 block of corners. "Top" is +Z, "right" is +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
    pub top_left: NodeId,
    pub top_right: NodeId,
    pub bottom_right: NodeId,
    pub bottom_left: NodeId,
    pub center_top: NodeId,
    pub center_right: NodeId,
    pub center_bottom: NodeId,
    pub center_left: NodeId,
    /// Active-corner bitmask in `[0, 15]`.
    pub config: u8,
}

/// Lookup-or-create table of edge nodes keyed by `(x, z, axis)`.
struct EdgeArena {
    depth: usize,
    slots: Vec<Option<NodeId>>,
}

impl EdgeArena {
    fn new(width: usize, depth: usize) -> Self {
        Self {
            depth,
            slots: vec![None; width * depth * 2],
        }
    }

    fn slot(&self, x: usize, z: usize, axis: EdgeAxis) -> usize {
        (x * self.depth + z) * 2 + axis as usize
    }

    /// The edge node extending from corner `(x, z)` along `axis`, created on
    /// first request at `corner_position` + half a cell along the axis.
    fn node_for(
        &mut self,
        nodes: &mut Vec<Node>,
        x: usize,
        z: usize,
        axis: EdgeAxis,
        corner_position: [f32; 3],
        cell_size: f32,
    ) -> NodeId {
        let slot = self.slot(x, z, axis);
        if let Some(id) = self.slots[slot] {
            return id;
        }
        let half = cell_size / 2.0;
        let [px, py, pz] = corner_position;
        let position = match axis {
            EdgeAxis::Right => [px + half, py, pz],
            EdgeAxis::Above => [px, py, pz + half],
        };
        let id = NodeId(nodes.len() as u32);
        nodes.push(Node {
            position,
            kind: NodeKind::Edge,
            vertex: None,
        });
        self.slots[slot] = Some(id);
        id
    }

    fn get(&self, x: usize, z: usize, axis: EdgeAxis) -> Option<NodeId> {
        self.slots.get(self.slot(x, z, axis)).copied().flatten()
    }
}

/// The full lattice: node arena plus quads.
pub struct SquareGrid {
    nodes: Vec<Node>,
    quads: Vec<Quad>,
    edges: EdgeArena,
    width: usize,
    depth: usize,
    cell_size: f32,
    rim_sealed: bool,
}

impl SquareGrid {
    /// Build the lattice for `grid` with cells `cell_size` wide.
    ///
    /// Quads are stored x-major: quad (x, z) has bottom-left corner (x, z).
    pub fn build(grid: &Grid, cell_size: f32) -> Self {
        let width = grid.width();
        let depth = grid.depth();
        let map_width = width as f32 * cell_size;
        let map_depth = depth as f32 * cell_size;

        let mut nodes = Vec::with_capacity(width * depth * 3);
        for x in 0..width {
            for z in 0..depth {
                let state = grid.get(x as i64, z as i64).unwrap_or(CellState::Filled);
                let position = [
                    -map_width / 2.0 + x as f32 * cell_size + cell_size / 2.0,
                    0.0,
                    -map_depth / 2.0 + z as f32 * cell_size + cell_size / 2.0,
                ];
                nodes.push(Node {
                    position,
                    kind: NodeKind::Corner {
                        active: state.is_wall(),
                        state,
                        rim: grid.is_border(x, z),
                    },
                    vertex: None,
                });
            }
        }

        let mut edges = EdgeArena::new(width, depth);
        let corner = |x: usize, z: usize| NodeId((x * depth + z) as u32);
        let quads_x = width.saturating_sub(1);
        let quads_z = depth.saturating_sub(1);
        let mut quads = Vec::with_capacity(quads_x * quads_z);

        for x in 0..quads_x {
            for z in 0..quads_z {
                let top_left = corner(x, z + 1);
                let top_right = corner(x + 1, z + 1);
                let bottom_right = corner(x + 1, z);
                let bottom_left = corner(x, z);

                let tl_pos = nodes[top_left.index()].position;
                let br_pos = nodes[bottom_right.index()].position;
                let bl_pos = nodes[bottom_left.index()].position;

                let center_top =
                    edges.node_for(&mut nodes, x, z + 1, EdgeAxis::Right, tl_pos, cell_size);
                let center_right =
                    edges.node_for(&mut nodes, x + 1, z, EdgeAxis::Above, br_pos, cell_size);
                let center_bottom =
                    edges.node_for(&mut nodes, x, z, EdgeAxis::Right, bl_pos, cell_size);
                let center_left =
                    edges.node_for(&mut nodes, x, z, EdgeAxis::Above, bl_pos, cell_size);

                let bit = |id: NodeId, weight: u8| {
                    if nodes[id.index()].is_active() {
                        weight
                    } else {
                        0
                    }
                };
                let config = bit(top_left, TOP_LEFT_BIT)
                    | bit(top_right, TOP_RIGHT_BIT)
                    | bit(bottom_right, BOTTOM_RIGHT_BIT)
                    | bit(bottom_left, BOTTOM_LEFT_BIT);

                quads.push(Quad {
                    top_left,
                    top_right,
                    bottom_right,
                    bottom_left,
                    center_top,
                    center_right,
                    center_bottom,
                    center_left,
                    config,
                });
            }
        }

        log::debug!(
            "square grid {}x{}: {} quads, {} nodes ({} edge)",
            width,
            depth,
            quads.len(),
            nodes.len(),
            nodes.len() - width * depth
        );

        Self {
            nodes,
            quads,
            edges,
            width,
            depth,
            cell_size,
            rim_sealed: grid.is_sealed(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Whether every rim corner is a wall, i.e. the source grid was sealed.
    pub fn rim_sealed(&self) -> bool {
        self.rim_sealed
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Quad whose bottom-left corner is `(x, z)`.
    pub fn quad(&self, x: usize, z: usize) -> Option<&Quad> {
        let quads_z = self.depth.saturating_sub(1);
        if x + 1 < self.width && z + 1 < self.depth {
            self.quads.get(x * quads_z + z)
        } else {
            None
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Corner node of cell `(x, z)`.
    pub fn corner(&self, x: usize, z: usize) -> Option<NodeId> {
        (x < self.width && z < self.depth).then(|| NodeId((x * self.depth + z) as u32))
    }

    /// Edge node extending from corner `(x, z)` along `axis`, if some quad
    /// uses it.
    pub fn edge_node(&self, x: usize, z: usize, axis: EdgeAxis) -> Option<NodeId> {
        if x < self.width && z < self.depth {
            self.edges.get(x, z, axis)
        } else {
            None
        }
    }

    pub fn edge_node_count(&self) -> usize {
        self.nodes.len() - self.width * self.depth
    }
}
