// Data-driven generation configuration.
//
// Every tunable parameter of a cave lives in `CaveConfig`: grid size, seed,
// fill thresholds, pass counts, mesh scale and wall height, plus the two
// nested breakpoint groups (`SmoothingBands`, `ScatterBands`) that turn a
// cell's neighborhood density score into a new state. The band values were
// tuned by eye; only the scoring/bucketing mechanism is load-bearing, so they
// are ordinary config fields rather than constants baked into the passes.
//
// `CaveConfig::validated()` is the single gate every generation goes through.
// It rejects impossible configurations (grids without a single 2×2 quad,
// threshold inversions, out-of-range pass counts, non-positive cell sizes)
// before anything is allocated, and returns a copy with the fill thresholds
// and the scatter chance clamped into `[0, 100]`.
//
// See also: `automaton.rs` which reads the thresholds and bands,
// `generate.rs` which validates and runs the pipeline, `main.rs` which loads
// configs from JSON.
//
// **Critical constraint: determinism.** Config values feed directly into the
// automaton. Two runs with identical configs produce identical caves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted `smooth_iterations` / `scatter_iterations`.
pub const MAX_ITERATIONS: u32 = 20;

/// Smallest accepted `width` / `depth`: one quad needs 2×2 corners.
pub const MIN_GRID_SIZE: usize = 2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a `CaveConfig` was rejected. Raised before any grid is allocated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 2x2 cells, got {width}x{depth}")]
    GridTooSmall { width: usize, depth: usize },

    #[error("empty_threshold ({empty}) must not exceed dust_threshold ({dust})")]
    ThresholdOrder { empty: i32, dust: i32 },

    #[error("{pass} iterations must be at most 20, got {count}")]
    TooManyIterations { pass: &'static str, count: u32 },

    #[error("cell_size must be a finite value > 0, got {0}")]
    InvalidCellSize(f32),

    #[error("wall_height must be a finite value >= 0, got {0}")]
    InvalidWallHeight(f32),

    #[error("smoothing bands out of order: empty_below {empty_below} > dust_below {dust_below}")]
    InvalidSmoothingBands { empty_below: i32, dust_below: i32 },

    #[error("scatter band ({band_low}, {band_high}) is empty or its fringe starts above it")]
    InvalidScatterBands { band_low: i32, band_high: i32 },
}

// ---------------------------------------------------------------------------
// Breakpoint groups
// ---------------------------------------------------------------------------

/// Score → state breakpoints for the smoothing pass.
///
/// `score < empty_below` → Empty, `score < dust_below` → Dust, else Filled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingBands {
    pub empty_below: i32,
    pub dust_below: i32,
}

impl Default for SmoothingBands {
    fn default() -> Self {
        Self {
            empty_below: 7,
            dust_below: 9,
        }
    }
}

/// Score bands for the dust scatter pass. All bounds are exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterBands {
    /// Cells scoring strictly inside `(band_low, band_high)` always become dust.
    pub band_low: i32,
    pub band_high: i32,
    /// Cells scoring inside `(fringe_low, band_high)` but outside the primary
    /// band become dust when a percentage roll lands below
    /// `fringe_chance_percent`.
    pub fringe_low: i32,
    pub fringe_chance_percent: i32,
}

impl Default for ScatterBands {
    fn default() -> Self {
        Self {
            band_low: -2,
            band_high: 6,
            fringe_low: -8,
            fringe_chance_percent: 70,
        }
    }
}

// ---------------------------------------------------------------------------
// CaveConfig
// ---------------------------------------------------------------------------

/// All parameters for one cave generation. Loaded from JSON or built in code;
/// missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Cells along X.
    pub width: usize,
    /// Cells along Z.
    pub depth: usize,

    /// Seed string, hashed to the PRNG seed with FNV-1a.
    pub seed: String,
    /// Ignore `seed` and derive a fresh one from the clock (non-reproducible).
    pub use_random_seed: bool,

    /// Fill roll below this → Empty.
    pub empty_threshold: i32,
    /// Fill roll below this (and not Empty) → Dust; everything else → Filled.
    pub dust_threshold: i32,

    pub smooth_iterations: u32,
    pub scatter_iterations: u32,

    /// World-space edge length of one cell.
    pub cell_size: f32,
    /// How far walls extrude below the floor.
    pub wall_height: f32,

    pub smoothing: SmoothingBands,
    pub scatter: ScatterBands,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 50,
            depth: 50,
            seed: "cavern".to_string(),
            use_random_seed: false,
            empty_threshold: 30,
            dust_threshold: 40,
            smooth_iterations: 5,
            scatter_iterations: 2,
            cell_size: 1.0,
            wall_height: 5.0,
            smoothing: SmoothingBands::default(),
            scatter: ScatterBands::default(),
        }
    }
}

impl CaveConfig {
    /// Check every constraint and return a copy with thresholds clamped to
    /// `[0, 100]`. Thresholds are clamped before their order is checked.
    pub fn validated(&self) -> Result<Self, ConfigError> {
        if self.width < MIN_GRID_SIZE || self.depth < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                depth: self.depth,
            });
        }

        let empty = self.empty_threshold.clamp(0, 100);
        let dust = self.dust_threshold.clamp(0, 100);
        if empty > dust {
            return Err(ConfigError::ThresholdOrder { empty, dust });
        }

        if self.smooth_iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations {
                pass: "smooth",
                count: self.smooth_iterations,
            });
        }
        if self.scatter_iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations {
                pass: "scatter",
                count: self.scatter_iterations,
            });
        }

        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.wall_height.is_finite() || self.wall_height < 0.0 {
            return Err(ConfigError::InvalidWallHeight(self.wall_height));
        }

        let empty_below = self.smoothing.empty_below;
        let dust_below = self.smoothing.dust_below;
        if empty_below > dust_below {
            return Err(ConfigError::InvalidSmoothingBands {
                empty_below,
                dust_below,
            });
        }

        let scatter = &self.scatter;
        if scatter.band_low >= scatter.band_high || scatter.fringe_low > scatter.band_low {
            return Err(ConfigError::InvalidScatterBands {
                band_low: scatter.band_low,
                band_high: scatter.band_high,
            });
        }

        Ok(Self {
            empty_threshold: empty,
            dust_threshold: dust,
            scatter: ScatterBands {
                fringe_chance_percent: scatter.fringe_chance_percent.clamp(0, 100),
                ..scatter.clone()
            },
            ..self.clone()
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CaveConfig::default();
        assert_eq!(config.validated(), Ok(config.clone()));
    }

    #[test]
    fn rejects_grids_without_a_quad() {
        for (width, depth) in [(1, 10), (10, 1), (0, 0)] {
            let config = CaveConfig {
                width,
                depth,
                ..CaveConfig::default()
            };
            assert_eq!(
                config.validated(),
                Err(ConfigError::GridTooSmall { width, depth })
            );
        }
        let smallest = CaveConfig {
            width: 2,
            depth: 2,
            ..CaveConfig::default()
        };
        assert!(smallest.validated().is_ok());
    }

    #[test]
    fn thresholds_are_clamped_not_rejected() {
        let config = CaveConfig {
            empty_threshold: -15,
            dust_threshold: 250,
            ..CaveConfig::default()
        };
        let valid = config.validated().unwrap();
        assert_eq!(valid.empty_threshold, 0);
        assert_eq!(valid.dust_threshold, 100);
    }

    #[test]
    fn inverted_thresholds_rejected_after_clamping() {
        let config = CaveConfig {
            empty_threshold: 120,
            dust_threshold: 60,
            ..CaveConfig::default()
        };
        assert_eq!(
            config.validated(),
            Err(ConfigError::ThresholdOrder {
                empty: 100,
                dust: 60
            })
        );
    }

    #[test]
    fn iteration_limits() {
        let at_limit = CaveConfig {
            smooth_iterations: MAX_ITERATIONS,
            scatter_iterations: MAX_ITERATIONS,
            ..CaveConfig::default()
        };
        assert!(at_limit.validated().is_ok());

        let too_many = CaveConfig {
            scatter_iterations: MAX_ITERATIONS + 1,
            ..CaveConfig::default()
        };
        assert_eq!(
            too_many.validated(),
            Err(ConfigError::TooManyIterations {
                pass: "scatter",
                count: 21
            })
        );
    }

    #[test]
    fn mesh_scale_constraints() {
        let zero_cell = CaveConfig {
            cell_size: 0.0,
            ..CaveConfig::default()
        };
        assert!(matches!(
            zero_cell.validated(),
            Err(ConfigError::InvalidCellSize(_))
        ));

        let nan_cell = CaveConfig {
            cell_size: f32::NAN,
            ..CaveConfig::default()
        };
        assert!(matches!(
            nan_cell.validated(),
            Err(ConfigError::InvalidCellSize(_))
        ));

        let flat_walls = CaveConfig {
            wall_height: 0.0,
            ..CaveConfig::default()
        };
        assert!(flat_walls.validated().is_ok());

        let negative_walls = CaveConfig {
            wall_height: -1.0,
            ..CaveConfig::default()
        };
        assert_eq!(
            negative_walls.validated(),
            Err(ConfigError::InvalidWallHeight(-1.0))
        );
    }

    #[test]
    fn band_constraints() {
        let smoothing = CaveConfig {
            smoothing: SmoothingBands {
                empty_below: 10,
                dust_below: 3,
            },
            ..CaveConfig::default()
        };
        assert!(matches!(
            smoothing.validated(),
            Err(ConfigError::InvalidSmoothingBands { .. })
        ));

        let scatter = CaveConfig {
            scatter: ScatterBands {
                band_low: 6,
                band_high: 6,
                ..ScatterBands::default()
            },
            ..CaveConfig::default()
        };
        assert!(matches!(
            scatter.validated(),
            Err(ConfigError::InvalidScatterBands { .. })
        ));

        let chance = CaveConfig {
            scatter: ScatterBands {
                fringe_chance_percent: 400,
                ..ScatterBands::default()
            },
            ..CaveConfig::default()
        };
        assert_eq!(chance.validated().unwrap().scatter.fringe_chance_percent, 100);
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ConfigError::GridTooSmall { width: 1, depth: 9 };
        assert_eq!(err.to_string(), "grid must be at least 2x2 cells, got 1x9");
    }

    #[test]
    fn json_roundtrip_and_partial_json() {
        let config = CaveConfig {
            seed: "json".to_string(),
            width: 12,
            ..CaveConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(CaveConfig::from_json(&json).unwrap(), config);

        // Omitted fields take their defaults.
        let partial = CaveConfig::from_json(r#"{ "width": 20, "seed": "abc" }"#).unwrap();
        assert_eq!(partial.width, 20);
        assert_eq!(partial.seed, "abc");
        assert_eq!(partial.depth, CaveConfig::default().depth);
        assert_eq!(partial.smoothing, SmoothingBands::default());
    }
}
