//! Game status evaluation
//!
//! Runs once per tick after the roll engine: bounds check, hazard check,
//! finish check, in that order. Leaving the board or touching a hole is an
//! ordinary gameplay outcome (a loss), never an error.

use glam::Vec2;

use crate::consts::*;
use crate::sim::grid::TileGrid;

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Lost,
    Won,
}

/// Evaluate the logical position against the board.
///
/// `hazard_radius` is the configured tolerance around inactive-tile centers;
/// the two shipped policies use 0.3 (footprint) and 0.1 (near center).
pub fn evaluate(grid: &TileGrid, pos: Vec2, hazard_radius: f32) -> Verdict {
    if pos.x > BOARD_MAX || pos.x < BOARD_MIN || pos.y > BOARD_MAX || pos.y < BOARD_MIN {
        return Verdict::Lost;
    }

    for tile in grid.iter() {
        if !tile.active
            && (pos.x - tile.pos.x).abs() < hazard_radius
            && (pos.y - tile.pos.y).abs() < hazard_radius
        {
            return Verdict::Lost;
        }
    }

    for tile in grid.iter() {
        if tile.active
            && tile.is_finish
            && (pos.x - tile.pos.x).abs() < ON_TILE_EPSILON
            && (pos.y - tile.pos.y).abs() < ON_TILE_EPSILON
        {
            return Verdict::Won;
        }
    }

    Verdict::Continue
}
