//! Tumbler - a Bloxorz-style block-rolling puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (block state machine, tile grid, levels)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Gameplay rules and user preferences
//! - `highscores`: Per-level best results

pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::BestResults;
pub use settings::{HazardPolicy, Rules, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one roll step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Grid dimensions (cells per side)
    pub const GRID_SIZE: usize = 10;
    /// Edge length of one tile cell in world units
    pub const CELL_SIZE: f32 = 0.4;
    /// Tile slab height
    pub const TILE_HEIGHT: f32 = 0.2;
    /// World-space z of the tile top surface (tiles are centered on z=0)
    pub const TILE_TOP: f32 = TILE_HEIGHT / 2.0;

    /// Block dimensions: the upright variant is one cell square, two tall
    pub const BLOCK_SIDE: f32 = CELL_SIZE;
    pub const BLOCK_TALL: f32 = 2.0 * CELL_SIZE;

    /// Angle advanced per tick while a roll is in flight (degrees)
    pub const ROLL_STEP_DEG: f32 = 3.0;
    /// Angle at which a roll completes. Slightly past 90 on purpose: the
    /// completion test must tolerate one tick of overshoot.
    pub const ROLL_COMPLETE_DEG: f32 = 91.0;
    /// Cells moved when a roll swaps orientation (1-cell and 2-cell
    /// footprints alternate, so the center travels one and a half cells)
    pub const SWAP_STEP_CELLS: f32 = 1.5;
    /// Cells moved by a log roll (same prone variant stays active)
    pub const LOG_ROLL_STEP_CELLS: f32 = 1.0;

    /// How close the block center must be to a tile center to count as
    /// standing on it (switch and finish checks)
    pub const ON_TILE_EPSILON: f32 = 0.1;
    /// Hazard radius when the footprint policy is in effect
    pub const HAZARD_RADIUS_FOOTPRINT: f32 = 0.3;
    /// Hazard radius when the near-center policy is in effect
    pub const HAZARD_RADIUS_NEAR: f32 = 0.1;

    /// Playable rectangle: [BOARD_MIN, BOARD_MAX] on both axes
    pub const BOARD_MIN: f32 = 0.0;
    pub const BOARD_MAX: f32 = 3.9;

    /// End-of-level fall animation: sink per tick, tilt per tick (degrees),
    /// and the sink depth at which the level transition fires
    pub const FALL_SINK_STEP: f32 = 0.08;
    pub const FALL_TILT_DEG: f32 = 3.0;
    pub const FALL_DEPTH_LIMIT: f32 = 10.0;

    /// Number of shipped levels
    pub const LEVEL_COUNT: u32 = 2;

    /// Start cell for every level
    pub const START_CELL: (usize, usize) = (1, 1);
}

/// Continuous-space center of a grid cell
#[inline]
pub fn cell_center(col: usize, row: usize) -> glam::Vec2 {
    glam::Vec2::new(
        col as f32 * consts::CELL_SIZE,
        row as f32 * consts::CELL_SIZE,
    )
}
