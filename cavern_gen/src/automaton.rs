// Cellular automaton that carves the cave grid.
//
// Generation runs in three phases, all driven by one seeded `CaveRng`:
//
// 1. Random fill: every interior cell rolls a percentage against the
//    configured thresholds (`< empty_threshold` → Empty, `< dust_threshold`
//    → Dust, else Filled). The outer ring is Filled and rolls nothing.
// 2. Smoothing: each pass re-scores every interior cell with the 3×3
//    density score and rebuckets it through `SmoothingBands`. Walls clump
//    together and open ground opens up.
// 3. Dust scatter: each pass flips cells in the mid-density band to Dust,
//    and gives cells on the band's low fringe a seeded chance to flip too.
//
// Both pass kinds score against a snapshot of the previous pass and write a
// fresh grid (full-grid-then-swap), so the result does not depend on scan
// order. Ring cells are skipped by every pass, which keeps the enclosing wall
// intact without a re-sealing step.
//
// See also: `grid.rs` for `density_score`, `config.rs` for the thresholds and
// bands, `generate.rs` which runs `CaveAutomaton::run`.
//
// **Critical constraint: determinism.** Cells are visited x-major, z-minor,
// and the scatter pass draws exactly one roll for every interior cell outside
// the primary band, whatever the roll decides.

use crate::config::{CaveConfig, ScatterBands, SmoothingBands};
use crate::grid::{CellState, Grid};
use crate::prng::CaveRng;

impl SmoothingBands {
    /// Bucket a density score into a new cell state.
    pub fn classify(&self, score: i32) -> CellState {
        if score < self.empty_below {
            CellState::Empty
        } else if score < self.dust_below {
            CellState::Dust
        } else {
            CellState::Filled
        }
    }
}

impl ScatterBands {
    fn in_band(&self, score: i32) -> bool {
        score > self.band_low && score < self.band_high
    }

    fn in_fringe(&self, score: i32) -> bool {
        score > self.fringe_low && score < self.band_high
    }
}

/// The automaton: a grid plus the generator and bands that evolve it.
#[derive(Clone, Debug)]
pub struct CaveAutomaton {
    grid: Grid,
    rng: CaveRng,
    smoothing: SmoothingBands,
    scatter: ScatterBands,
}

impl CaveAutomaton {
    /// Seeded random fill of a fresh grid. `config` is expected to have been
    /// through `CaveConfig::validated()`.
    pub fn random_fill(config: &CaveConfig, mut rng: CaveRng) -> Self {
        let mut grid = Grid::new_walled(config.width, config.depth, CellState::Filled);

        for x in 1..config.width.saturating_sub(1) {
            for z in 1..config.depth.saturating_sub(1) {
                let roll = rng.roll_percent();
                let state = if roll < config.empty_threshold {
                    CellState::Empty
                } else if roll < config.dust_threshold {
                    CellState::Dust
                } else {
                    CellState::Filled
                };
                grid.set(x as i64, z as i64, state);
            }
        }

        log::debug!(
            "random fill {}x{}: {} empty, {} dust, {} filled",
            config.width,
            config.depth,
            grid.count(CellState::Empty),
            grid.count(CellState::Dust),
            grid.count(CellState::Filled)
        );

        Self {
            grid,
            rng,
            smoothing: config.smoothing.clone(),
            scatter: config.scatter.clone(),
        }
    }

    /// Run the full automaton: fill, `smooth_iterations` smoothing passes,
    /// then `scatter_iterations` scatter passes.
    pub fn run(config: &CaveConfig, rng: CaveRng) -> Grid {
        let mut automaton = Self::random_fill(config, rng);
        for _ in 0..config.smooth_iterations {
            automaton.smooth();
        }
        for _ in 0..config.scatter_iterations {
            automaton.scatter();
        }
        automaton.into_grid()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// One smoothing pass over every interior cell.
    pub fn smooth(&mut self) {
        let source = &self.grid;
        let mut next = source.clone();
        for (x, z) in interior_cells(source) {
            let score = source.density_score(x as i64, z as i64);
            next.set(x as i64, z as i64, self.smoothing.classify(score));
        }
        self.grid = next;
        log::debug!(
            "smooth pass: {} filled, {} open",
            self.grid.count(CellState::Filled),
            self.grid.count(CellState::Empty) + self.grid.count(CellState::Dust)
        );
    }

    /// One dust scatter pass over every interior cell.
    pub fn scatter(&mut self) {
        let source = &self.grid;
        let mut next = source.clone();
        let mut flipped = 0usize;
        for (x, z) in interior_cells(source) {
            let score = source.density_score(x as i64, z as i64);
            let dust = if self.scatter.in_band(score) {
                true
            } else {
                let roll = self.rng.roll_percent();
                roll < self.scatter.fringe_chance_percent && self.scatter.in_fringe(score)
            };
            if dust {
                next.set(x as i64, z as i64, CellState::Dust);
                flipped += 1;
            }
        }
        self.grid = next;
        log::debug!("scatter pass: {flipped} cells dusted");
    }
}

/// Interior coordinates (everything but the outer ring), x-major.
fn interior_cells(grid: &Grid) -> impl Iterator<Item = (usize, usize)> + use<> {
    let width = grid.width();
    let depth = grid.depth();
    (1..width.saturating_sub(1))
        .flat_map(move |x| (1..depth.saturating_sub(1)).map(move |z| (x, z)))
}
