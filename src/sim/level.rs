//! Level director: topology builders and switch reactions
//!
//! Levels carve their walkable shape out of a full grid, place the special
//! tiles, and declare data-driven switch rules. Malformed topology fails the
//! load with a typed error instead of corrupting runtime state.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::grid::TileGrid;

/// Errors detected while building a level
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {0} is not a shipped level")]
    UnknownLevel(u32),

    #[error("switch rule points at ({0}, {1}), which is not a switch tile")]
    NotASwitch(usize, usize),

    #[error("switch at ({0}, {1}) has no paired bridge tiles")]
    SwitchWithoutBridge(usize, usize),

    #[error("bridge cell ({0}, {1}) is not flagged as a bridge")]
    NotABridge(usize, usize),

    #[error("level {0} has no finish tile")]
    NoFinish(u32),
}

/// A switch tile paired with the bridge tiles it controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchRule {
    pub switch: (usize, usize),
    pub bridge: Vec<(usize, usize)>,
}

/// Per-level reactive state: the switch rules plus the latched grid index
/// that makes switch firing edge-triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level number
    pub number: u32,
    pub rules: Vec<SwitchRule>,
    /// Rounded grid index at the last edge trigger; updates only while the
    /// block stands upright
    last_index: Option<(usize, usize)>,
}

impl LevelState {
    /// Edge-triggered switch reaction. A switch fires only on the tick the
    /// latched grid index changes while the block stands on it, so resting
    /// on a switch does not re-trigger every tick.
    pub fn react(&mut self, grid: &mut TileGrid, pos: Vec2, upright: bool) {
        if !upright {
            return;
        }
        let index = (
            (pos.x / CELL_SIZE).round() as usize,
            (pos.y / CELL_SIZE).round() as usize,
        );
        if self.last_index == Some(index) {
            return;
        }
        self.last_index = Some(index);

        for rule in &self.rules {
            let (col, row) = rule.switch;
            if grid.is_on_tile(pos, col, row, ON_TILE_EPSILON) {
                let toggled = !grid.tile(col, row).toggled;
                grid.tile_mut(col, row).toggled = toggled;
                for &(bc, br) in &rule.bridge {
                    let tile = grid.tile_mut(bc, br);
                    tile.active = !tile.active;
                }
                log::debug!(
                    "switch ({col}, {row}) fired, bridge group {} -> toggled={toggled}",
                    rule.bridge.len()
                );
            }
        }
    }
}

/// Build a level's grid and reactive state. Levels are 1-based.
pub fn build(number: u32) -> Result<(TileGrid, LevelState), LevelError> {
    let (grid, rules) = match number {
        1 => build_level_1(),
        2 => build_level_2(),
        _ => return Err(LevelError::UnknownLevel(number)),
    };
    validate(&grid, &rules, number)?;
    Ok((
        grid,
        LevelState {
            number,
            rules,
            last_index: None,
        },
    ))
}

/// An S-shaped walk from the start corner to the finish at (8, 8)
fn build_level_1() -> (TileGrid, Vec<SwitchRule>) {
    let mut grid = TileGrid::full();
    grid.place(8, 8, false, true, true); // fragile+bridge derives finish

    grid.carve(0..7, 3..10);
    grid.carve(3..7, 0..1);
    grid.carve(3..7, 2..3);
    grid.carve(7..8, 3..7);
    grid.carve(9..10, 3..7);

    (grid, Vec::new())
}

/// Two islands joined by switch-controlled bridge segments; finish at (9, 9)
fn build_level_2() -> (TileGrid, Vec<SwitchRule>) {
    let mut grid = TileGrid::full();
    grid.place(9, 9, false, true, true);
    grid.place(9, 0, true, false, false);
    grid.place(4, 7, true, false, false);
    for row in 4..9 {
        grid.place(0, row, false, false, true);
    }
    for row in 2..7 {
        grid.place(4, row, false, false, true);
    }

    // Carve everything, then re-activate the walkable set. The bridge
    // columns stay inactive until their switches raise them.
    grid.set_active(0..GRID_SIZE, 0..GRID_SIZE, false);
    grid.set_active(0..4, 0..4, true);
    grid.set_active(4..9, 0..1, true);
    grid.set_active(0..9, 9..10, true);
    grid.tile_mut(9, 9).active = true;
    grid.tile_mut(9, 0).active = true;
    grid.tile_mut(4, 7).active = true;

    let rules = vec![
        SwitchRule {
            switch: (9, 0),
            bridge: (2..7).map(|row| (4, row)).collect(),
        },
        SwitchRule {
            switch: (4, 7),
            bridge: (4..9).map(|row| (0, row)).collect(),
        },
    ];
    (grid, rules)
}

/// Reject malformed topology at load time
pub(crate) fn validate(
    grid: &TileGrid,
    rules: &[SwitchRule],
    number: u32,
) -> Result<(), LevelError> {
    if !grid.iter().any(|t| t.is_finish) {
        return Err(LevelError::NoFinish(number));
    }
    for rule in rules {
        let (col, row) = rule.switch;
        if !grid.tile(col, row).is_switch {
            return Err(LevelError::NotASwitch(col, row));
        }
        if rule.bridge.is_empty() {
            return Err(LevelError::SwitchWithoutBridge(col, row));
        }
        for &(bc, br) in &rule.bridge {
            if !grid.tile(bc, br).is_bridge {
                return Err(LevelError::NotABridge(bc, br));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center;

    #[test]
    fn test_shipped_levels_load() {
        for number in 1..=LEVEL_COUNT {
            let (grid, level) = build(number).expect("shipped level must load");
            assert_eq!(level.number, number);
            assert!(grid.iter().any(|t| t.is_finish));
            // The start cell is walkable in every level
            assert!(grid.tile(START_CELL.0, START_CELL.1).active);
        }
        assert!(matches!(build(99), Err(LevelError::UnknownLevel(99))));
    }

    #[test]
    fn test_level_1_topology() {
        let (grid, level) = build(1).unwrap();
        assert!(grid.tile(8, 8).is_finish);
        assert!(grid.tile(8, 8).active);
        assert!(!grid.tile(0, 3).active);
        assert!(!grid.tile(4, 0).active);
        assert!(level.rules.is_empty());
    }

    #[test]
    fn test_level_2_bridges_start_lowered() {
        let (grid, level) = build(2).unwrap();
        assert_eq!(level.rules.len(), 2);
        for rule in &level.rules {
            let (col, row) = rule.switch;
            assert!(grid.tile(col, row).is_switch);
            assert!(grid.tile(col, row).active);
            for &(bc, br) in &rule.bridge {
                assert!(grid.tile(bc, br).is_bridge);
                assert!(!grid.tile(bc, br).active);
            }
        }
    }

    #[test]
    fn test_validation_rejects_rule_without_switch_tile() {
        let grid = {
            let mut g = TileGrid::full();
            g.place(8, 8, false, true, true);
            g
        };
        let rules = vec![SwitchRule {
            switch: (2, 2),
            bridge: vec![(3, 3)],
        }];
        assert!(matches!(
            validate(&grid, &rules, 1),
            Err(LevelError::NotASwitch(2, 2))
        ));
    }

    #[test]
    fn test_validation_rejects_switch_without_bridge() {
        let mut grid = TileGrid::full();
        grid.place(8, 8, false, true, true);
        grid.place(2, 2, true, false, false);
        let rules = vec![SwitchRule {
            switch: (2, 2),
            bridge: Vec::new(),
        }];
        assert!(matches!(
            validate(&grid, &rules, 1),
            Err(LevelError::SwitchWithoutBridge(2, 2))
        ));
    }

    #[test]
    fn test_switch_fires_on_edge_only() {
        let (mut grid, mut level) = build(2).unwrap();
        let switch_pos = cell_center(9, 0);
        let bridge = level.rules[0].bridge.clone();

        // Arrive on the switch: bridge group rises
        level.react(&mut grid, switch_pos, true);
        assert!(bridge.iter().all(|&(c, r)| grid.tile(c, r).active));
        assert!(grid.tile(9, 0).toggled);

        // Resting on it does not re-trigger
        level.react(&mut grid, switch_pos, true);
        assert!(bridge.iter().all(|&(c, r)| grid.tile(c, r).active));

        // Step off, come back: toggles the group down again
        level.react(&mut grid, cell_center(8, 0), true);
        level.react(&mut grid, switch_pos, true);
        assert!(bridge.iter().all(|&(c, r)| !grid.tile(c, r).active));
        assert!(!grid.tile(9, 0).toggled);
    }

    #[test]
    fn test_prone_block_does_not_trigger() {
        let (mut grid, mut level) = build(2).unwrap();
        let switch_pos = cell_center(9, 0);
        level.react(&mut grid, switch_pos, false);
        let bridge = &level.rules[0].bridge;
        assert!(bridge.iter().all(|&(c, r)| !grid.tile(c, r).active));
    }
}
