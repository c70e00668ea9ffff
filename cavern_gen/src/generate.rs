// Pipeline entry points.
//
// `generate()` is the one blocking call a host makes: validate the config,
// resolve the seed, run the automaton, then mesh the finished grid. It either
// returns a complete `Cave` or a `ConfigError` before anything is allocated.
//
// `mesh_grid()` is the meshing half on its own, for callers that bring their
// own grid (hand-painted maps, tests). Stages:
//   Grid → SquareGrid → Triangulation → outlines → wall mesh
//
// **Critical constraint: determinism.** With `use_random_seed == false` the
// result is a pure function of the config. The clock is only read to invent
// a seed, and that seed is returned in `Cave::seed` so the run can be
// replayed.
//
// See also: `config.rs` for validation, `automaton.rs`, `square_grid.rs`,
// `triangulate.rs`, `outline.rs`, `wall_mesh.rs` for the stages.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::automaton::CaveAutomaton;
use crate::config::{CaveConfig, ConfigError};
use crate::grid::Grid;
use crate::mesh::MeshData;
use crate::outline::{Outline, extract_outlines};
use crate::prng::CaveRng;
use crate::square_grid::SquareGrid;
use crate::triangulate::triangulate;
use crate::wall_mesh::build_wall_mesh;

/// Meshes derived from one grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaveMeshes {
    /// Wall-top surface; triangles face +Y.
    pub floor: MeshData,
    /// Vertical walls hanging from the floor's outlines.
    pub walls: MeshData,
    /// Closed boundary loops of floor vertex ids.
    pub outlines: Vec<Outline>,
}

/// A generated cave: the seed actually used, the final grid and its meshes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cave {
    pub seed: String,
    pub grid: Grid,
    pub floor: MeshData,
    pub walls: MeshData,
    pub outlines: Vec<Outline>,
}

/// Run the full pipeline for `config`.
pub fn generate(config: &CaveConfig) -> Result<Cave, ConfigError> {
    let config = config.validated()?;
    let seed = if config.use_random_seed {
        clock_seed()
    } else {
        config.seed.clone()
    };

    let rng = CaveRng::from_seed_str(&seed);
    let grid = CaveAutomaton::run(&config, rng);
    let CaveMeshes {
        floor,
        walls,
        outlines,
    } = mesh_grid(&grid, config.cell_size, config.wall_height);

    log::info!(
        "generated {}x{} cave (seed {:?}): {} floor triangles, {} outlines, {} wall triangles",
        grid.width(),
        grid.depth(),
        seed,
        floor.triangle_count(),
        outlines.len(),
        walls.triangle_count()
    );

    Ok(Cave {
        seed,
        grid,
        floor,
        walls,
        outlines,
    })
}

/// Mesh an existing grid. `cell_size` must be positive; a grid smaller than
/// 2×2 has no quads and yields empty meshes. The grid need not be sealed:
/// outlines of an unsealed grid close along the map edge.
pub fn mesh_grid(grid: &Grid, cell_size: f32, wall_height: f32) -> CaveMeshes {
    let mut square_grid = SquareGrid::build(grid, cell_size);
    let triangulation = triangulate(&mut square_grid);
    let outlines = extract_outlines(
        &triangulation.floor,
        &triangulation.adjacency,
        &triangulation.interior,
    );
    let walls = build_wall_mesh(
        &outlines,
        &triangulation.floor,
        &triangulation.adjacency,
        wall_height,
    );
    CaveMeshes {
        floor: triangulation.floor,
        walls,
        outlines,
    }
}

/// A fresh seed string from the wall clock.
fn clock_seed() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos:x}")
}
