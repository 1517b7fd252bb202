//! Tile grid model
//!
//! A fixed 10x10 field of tile cells. Tiles start active; levels carve their
//! walkable shape by deactivating cells (complement-based carving) and flag
//! individual cells as switch, fragile, bridge, or finish.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_center;
use crate::consts::*;

/// One cell of the level grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Continuous-space center of the cell
    pub pos: Vec2,
    /// Whether standing on this cell is safe
    pub active: bool,
    pub is_switch: bool,
    pub is_fragile: bool,
    pub is_bridge: bool,
    pub is_finish: bool,
    /// For switch tiles: last-known activation state, flipped on each
    /// edge-triggered firing
    pub toggled: bool,
}

impl Tile {
    /// Create a tile at a cell. A tile asked to be both fragile and bridge
    /// is a finish tile instead; the two flags are a derived category, not a
    /// combinable pair.
    pub fn new(col: usize, row: usize, is_switch: bool, is_fragile: bool, is_bridge: bool) -> Self {
        let is_finish = is_fragile && is_bridge;
        Self {
            pos: cell_center(col, row),
            active: true,
            is_switch,
            is_fragile: is_fragile && !is_finish,
            is_bridge: is_bridge && !is_finish,
            is_finish,
            toggled: false,
        }
    }

    fn plain(col: usize, row: usize) -> Self {
        Self::new(col, row, false, false, false)
    }
}

/// The 10x10 tile field, indexed [col][row]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Fully-active grid of plain tiles
    pub fn full() -> Self {
        let mut tiles = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for col in 0..GRID_SIZE {
            for row in 0..GRID_SIZE {
                tiles.push(Tile::plain(col, row));
            }
        }
        Self { tiles }
    }

    pub fn tile(&self, col: usize, row: usize) -> &Tile {
        &self.tiles[col * GRID_SIZE + row]
    }

    pub fn tile_mut(&mut self, col: usize, row: usize) -> &mut Tile {
        &mut self.tiles[col * GRID_SIZE + row]
    }

    /// Replace a cell (keeps the cell's derived position)
    pub fn place(&mut self, col: usize, row: usize, is_switch: bool, is_fragile: bool, is_bridge: bool) {
        *self.tile_mut(col, row) = Tile::new(col, row, is_switch, is_fragile, is_bridge);
    }

    /// Deactivate a rectangular range of cells (half-open on both axes)
    pub fn carve(&mut self, cols: std::ops::Range<usize>, rows: std::ops::Range<usize>) {
        for col in cols {
            for row in rows.clone() {
                self.tile_mut(col, row).active = false;
            }
        }
    }

    /// Set `active` over a rectangular range of cells
    pub fn set_active(&mut self, cols: std::ops::Range<usize>, rows: std::ops::Range<usize>, active: bool) {
        for col in cols {
            for row in rows.clone() {
                self.tile_mut(col, row).active = active;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Is a continuous position standing on the given cell? Symmetric
    /// absolute-difference comparison around the tile center, independent of
    /// approach direction.
    pub fn is_on_tile(&self, pos: Vec2, col: usize, row: usize, eps: f32) -> bool {
        let tile = self.tile(col, row);
        (pos.x - tile.pos.x).abs() < eps && (pos.y - tile.pos.y).abs() < eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragile_and_bridge_derive_finish() {
        let tile = Tile::new(8, 8, false, true, true);
        assert!(tile.is_finish);
        assert!(!tile.is_fragile);
        assert!(!tile.is_bridge);
    }

    #[test]
    fn test_plain_flags_survive() {
        let tile = Tile::new(4, 7, true, false, false);
        assert!(tile.is_switch);
        assert!(!tile.is_finish);
        let tile = Tile::new(0, 4, false, false, true);
        assert!(tile.is_bridge);
        assert!(!tile.is_finish);
    }

    #[test]
    fn test_cell_centers() {
        let grid = TileGrid::full();
        assert_eq!(grid.tile(0, 0).pos, Vec2::new(0.0, 0.0));
        assert_eq!(grid.tile(3, 7).pos, Vec2::new(1.2, 2.8));
    }

    #[test]
    fn test_carve_deactivates_range() {
        let mut grid = TileGrid::full();
        grid.carve(0..7, 3..10);
        assert!(!grid.tile(0, 3).active);
        assert!(!grid.tile(6, 9).active);
        assert!(grid.tile(7, 3).active);
        assert!(grid.tile(0, 2).active);
    }

    #[test]
    fn test_is_on_tile_symmetric() {
        let grid = TileGrid::full();
        let center = grid.tile(2, 2).pos;
        // Same offset accepted from either side, on both axes
        for delta in [Vec2::new(0.09, 0.0), Vec2::new(0.0, 0.09)] {
            assert!(grid.is_on_tile(center + delta, 2, 2, ON_TILE_EPSILON));
            assert!(grid.is_on_tile(center - delta, 2, 2, ON_TILE_EPSILON));
        }
        for delta in [Vec2::new(0.11, 0.0), Vec2::new(0.0, 0.11)] {
            assert!(!grid.is_on_tile(center + delta, 2, 2, ON_TILE_EPSILON));
            assert!(!grid.is_on_tile(center - delta, 2, 2, ON_TILE_EPSILON));
        }
    }
}
