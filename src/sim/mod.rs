//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Single-threaded mutation in a fixed per-tick order
//! - No rendering or platform dependencies

pub mod block;
pub mod grid;
pub mod level;
pub mod state;
pub mod status;
pub mod tick;

pub use block::{Axis, BlockSet, Direction, Orientation, RollState, Variant};
pub use grid::{Tile, TileGrid};
pub use level::{LevelError, LevelState, SwitchRule};
pub use state::{FallAnim, GamePhase, GameState};
pub use status::{Verdict, evaluate};
pub use tick::{TickInput, tick};
