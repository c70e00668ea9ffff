// cavern_gen: procedural cave maps meshed by marching squares.
//
// A seeded cellular automaton carves a 2D cell grid into caves; the finished
// grid is converted into a triangulated floor mesh (the wall tops) and a set
// of extruded side walls traced from the floor's boundary outlines. The crate
// has no engine dependencies: it hands flat vertex/index buffers to whatever
// host renders them.
//
// Module overview:
// - `config.rs`:      CaveConfig + smoothing/scatter bands, validation, ConfigError.
// - `grid.rs`:        Dense 2D cell grid (CellState) and the neighborhood density score.
// - `automaton.rs`:   Random fill, smoothing passes, dust scatter passes.
// - `square_grid.rs`: Corner/edge node lattice and the 2×2 quads classified into 16 configs.
// - `triangulate.rs`: Marching-squares case table, vertex dedup, adjacency index.
// - `mesh.rs`:        MeshData buffers and the vertex → triangle AdjacencyIndex.
// - `outline.rs`:     Boundary-edge test and closed outline tracing.
// - `wall_mesh.rs`:   Wall extrusion along outlines.
// - `generate.rs`:    `generate()`, the single blocking pipeline entry point.
// - `export.rs`:      Wavefront OBJ writer for the floor and wall meshes.
// - `prng`:           Re-exported from `cavern_prng`: xoshiro256++ with string seeds.
//
// Pipeline (each stage is a pure transformation of the previous output):
//   CaveAutomaton → Grid → SquareGrid → Triangulation → Vec<Outline> → walls
//
// **Critical constraint: determinism.** Given an identical `CaveConfig` (and
// `use_random_seed == false`), every buffer produced is identical across runs
// and platforms. All randomness comes from `cavern_prng`. No `HashMap`, no
// system time outside the explicit random-seed mode.

pub mod automaton;
pub mod config;
pub mod export;
pub mod generate;
pub mod grid;
pub mod mesh;
pub mod outline;
pub mod square_grid;
pub mod triangulate;
pub mod wall_mesh;

pub use cavern_prng as prng;

pub use config::{CaveConfig, ConfigError};
pub use generate::{Cave, CaveMeshes, generate, mesh_grid};
