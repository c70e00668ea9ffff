// Dense 2D cell grid for the cave automaton.
//
// The grid is stored as a flat `Vec<CellState>` indexed by `x * depth + z`
// (x-major, matching the automaton's scan order). Reads go through
// `get()`, which takes signed coordinates and returns `None` outside the
// grid, so every neighborhood scan is bounds-checked by predicate rather than
// by catching a failed index. Out-of-bounds writes are no-ops.
//
// The outer ring (x = 0, x = width-1, z = 0, z = depth-1) is the enclosing
// wall: `Grid::new_walled` creates it `Filled` and the automaton never writes
// ring cells, so the invariant holds for every grid handed to the mesher.
//
// Deserialization goes through `RawGrid` and rejects a cell vector whose
// length is not `width * depth`, so `get()` can index without re-checking.
//
// See also: `automaton.rs` for the passes that mutate the grid,
// `square_grid.rs` which turns each cell into a corner node.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Density contribution of a neighbor outside the grid. Higher than any cell
/// state so the map closes naturally at its border.
pub const OUT_OF_BOUNDS_WEIGHT: i32 = 4;

/// State of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Open floor.
    Empty,
    /// Cosmetic sub-state scattered over open ground; not a wall.
    Dust,
    /// Solid wall.
    Filled,
}

impl CellState {
    /// Only `Filled` cells are walls for meshing purposes.
    pub fn is_wall(self) -> bool {
        self == CellState::Filled
    }

    /// Contribution of this state to a neighbor's density score.
    pub fn density_weight(self) -> i32 {
        match self {
            CellState::Empty => -2,
            CellState::Dust => 1,
            CellState::Filled => 3,
        }
    }
}

/// A deserialized grid whose storage does not match its dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("grid is {width}x{depth} but stores {cells} cells")]
pub struct GridShapeError {
    pub width: usize,
    pub depth: usize,
    pub cells: usize,
}

/// Wire form of `Grid`, checked before it becomes one.
#[derive(Deserialize)]
struct RawGrid {
    cells: Vec<CellState>,
    width: usize,
    depth: usize,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let expected = raw.width.checked_mul(raw.depth);
        if expected != Some(raw.cells.len()) {
            return Err(GridShapeError {
                width: raw.width,
                depth: raw.depth,
                cells: raw.cells.len(),
            });
        }
        Ok(Self {
            cells: raw.cells,
            width: raw.width,
            depth: raw.depth,
        })
    }
}

/// Dense `width × depth` cell grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    /// Flat storage: index = x * depth + z.
    cells: Vec<CellState>,
    width: usize,
    depth: usize,
}

impl Grid {
    /// Create a grid with every cell set to `fill`.
    pub fn new(width: usize, depth: usize, fill: CellState) -> Self {
        Self {
            cells: vec![fill; width * depth],
            width,
            depth,
        }
    }

    /// Create a grid whose interior is `interior` and whose outer ring is
    /// `Filled`.
    pub fn new_walled(width: usize, depth: usize, interior: CellState) -> Self {
        let mut grid = Self::new(width, depth, interior);
        grid.seal_border();
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Check whether a signed coordinate is within bounds.
    pub fn in_bounds(&self, x: i64, z: i64) -> bool {
        x >= 0 && z >= 0 && (x as u64) < self.width as u64 && (z as u64) < self.depth as u64
    }

    /// Whether `(x, z)` lies on the outer ring.
    pub fn is_border(&self, x: usize, z: usize) -> bool {
        x == 0 || z == 0 || x + 1 == self.width || z + 1 == self.depth
    }

    fn index(&self, x: i64, z: i64) -> Option<usize> {
        if self.in_bounds(x, z) {
            Some(x as usize * self.depth + z as usize)
        } else {
            None
        }
    }

    /// Read a cell. Returns `None` for out-of-bounds coordinates.
    pub fn get(&self, x: i64, z: i64) -> Option<CellState> {
        self.index(x, z).map(|i| self.cells[i])
    }

    /// Write a cell. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, x: i64, z: i64, state: CellState) {
        if let Some(i) = self.index(x, z) {
            self.cells[i] = state;
        }
    }

    /// Force every cell of the outer ring to `Filled`.
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            for z in 0..self.depth {
                if self.is_border(x, z) {
                    self.set(x as i64, z as i64, CellState::Filled);
                }
            }
        }
    }

    /// Whether every cell of the outer ring is `Filled`.
    pub fn is_sealed(&self) -> bool {
        self.iter()
            .all(|(x, z, state)| !self.is_border(x, z) || state == CellState::Filled)
    }

    /// Sum of neighbor weights over the 3×3 neighborhood of `(x, z)`,
    /// excluding the cell itself. Out-of-bounds neighbors count
    /// `OUT_OF_BOUNDS_WEIGHT`.
    pub fn density_score(&self, x: i64, z: i64) -> i32 {
        let mut score = 0;
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                score += match self.get(x + dx, z + dz) {
                    Some(state) => state.density_weight(),
                    None => OUT_OF_BOUNDS_WEIGHT,
                };
            }
        }
        score
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Iterate `(x, z, state)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        let depth = self.depth;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &state)| (i / depth, i % depth, state))
    }
}
