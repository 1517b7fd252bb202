//! Fixed timestep simulation tick
//!
//! One call per frame step, mutating state in a fixed order: apply input,
//! advance the roll interpolation, evaluate game status, apply level
//! reactions. The renderer snapshots the result after the tick.

use crate::consts::*;
use crate::sim::block::Orientation;
use crate::sim::state::{GamePhase, GameState};
use crate::sim::status::{self, Verdict};

/// Input commands for a single tick. Roll commands are key-press edges, not
/// held-repeat; the caller clears one-shot fields after each processed tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directional roll command
    pub roll: Option<crate::sim::block::Direction>,
    /// Abandon the run and start over at level 1
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart_run();
        return;
    }

    match state.phase {
        GamePhase::Playing => {
            // A roll command is ignored while one is already in flight
            if let Some(direction) = input.roll {
                if state.block.begin_roll(direction) {
                    state.moves += 1;
                    log::debug!("move {}: roll {direction:?}", state.moves);
                }
            }

            state
                .block
                .advance_roll(state.rules.roll_step_deg, state.rules.roll_complete_deg);

            match status::evaluate(&state.grid, state.block.pos, state.rules.hazard.radius()) {
                Verdict::Lost => end_level(state, false),
                Verdict::Won => end_level(state, true),
                Verdict::Continue => {
                    let upright = state.block.active_orientation() == Orientation::Upright;
                    state
                        .level
                        .react(&mut state.grid, state.block.pos, upright);
                }
            }
        }

        GamePhase::Falling { won } => {
            state.fall.depth += FALL_SINK_STEP;
            state.fall.tilt_deg += FALL_TILT_DEG;
            if state.fall.depth > FALL_DEPTH_LIMIT {
                if won {
                    state.advance_level();
                } else {
                    state.reset_level();
                }
            }
        }

        GamePhase::Complete => {}
    }
}

fn end_level(state: &mut GameState, won: bool) {
    log::info!(
        "level {} {} after {} moves",
        state.level.number,
        if won { "cleared" } else { "failed" },
        state.moves
    );
    if state.rules.finish_fall {
        state.phase = GamePhase::Falling { won };
    } else if won {
        state.advance_level();
    } else {
        state.reset_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center;
    use crate::settings::Rules;
    use crate::sim::block::{BlockSet, Direction, RollState};
    use proptest::prelude::*;

    fn idle_until_settled(state: &mut GameState, max_ticks: usize) {
        let input = TickInput::default();
        for _ in 0..max_ticks {
            if !state.block.is_rolling() {
                return;
            }
            tick(state, &input);
        }
        panic!("roll never settled");
    }

    fn press(state: &mut GameState, direction: Direction) {
        let input = TickInput {
            roll: Some(direction),
            ..Default::default()
        };
        tick(state, &input);
    }

    #[test]
    fn test_roll_right_from_start() {
        // Scenario A: upright at (0.4, 0.4) ends prone-X at (1.0, 0.4)
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Right);
        assert!(state.block.is_rolling());
        idle_until_settled(&mut state, 64);
        assert_eq!(
            state.block.active_orientation(),
            crate::sim::block::Orientation::ProneX
        );
        assert!((state.block.pos.x - 1.0).abs() < 1e-5);
        assert!((state.block.pos.y - 0.4).abs() < 1e-5);
        assert_eq!(state.moves, 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_input_ignored_while_rolling() {
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Right);

        // Hammer other directions mid-roll; they must all be no-ops
        for _ in 0..5 {
            press(&mut state, Direction::Up);
        }
        idle_until_settled(&mut state, 64);

        let mut reference = GameState::new(Rules::default()).unwrap();
        press(&mut reference, Direction::Right);
        idle_until_settled(&mut reference, 64);

        assert_eq!(state.block, reference.block);
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_repeated_same_input_is_idempotent() {
        let mut once = GameState::new(Rules::default()).unwrap();
        press(&mut once, Direction::Right);
        idle_until_settled(&mut once, 64);

        let mut many = GameState::new(Rules::default()).unwrap();
        for _ in 0..10 {
            press(&mut many, Direction::Right);
        }
        idle_until_settled(&mut many, 64);

        assert_eq!(once.block, many.block);
        assert_eq!(once.moves, many.moves);
    }

    #[test]
    fn test_round_trip_returns_to_start() {
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Right);
        idle_until_settled(&mut state, 64);
        press(&mut state, Direction::Left);
        idle_until_settled(&mut state, 64);
        assert_eq!(
            state.block.active_orientation(),
            crate::sim::block::Orientation::Upright
        );
        assert!((state.block.pos - cell_center(1, 1)).length() < 1e-5);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_rolling_onto_hole_loses() {
        // Scenario C: on level 1, rolling up from the start lands the prone
        // block against the carved region above row 2
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Up);
        idle_until_settled(&mut state, 64);
        assert_eq!(state.phase, GamePhase::Falling { won: false });

        // The loss is terminal for the attempt: input no longer lands
        press(&mut state, Direction::Down);
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_lose_then_reset_restores_level() {
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Up);
        idle_until_settled(&mut state, 64);
        assert_eq!(state.phase, GamePhase::Falling { won: false });

        let input = TickInput::default();
        for _ in 0..200 {
            tick(&mut state, &input);
            if state.phase == GamePhase::Playing {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!((state.block.pos - cell_center(1, 1)).length() < 1e-5);
        assert_eq!(state.level.number, 1);
        assert_eq!(state.moves, 1);
    }

    #[test]
    fn test_falling_out_of_bounds_loses() {
        let mut state = GameState::new(Rules::default()).unwrap();
        press(&mut state, Direction::Down);
        idle_until_settled(&mut state, 64);
        // Prone-Y at (0.4, -0.2): off the board
        assert_eq!(state.phase, GamePhase::Falling { won: false });
    }

    #[test]
    fn test_finish_tile_wins_and_advances() {
        // Scenario D: stand the block on level 1's finish tile
        let mut state = GameState::new(Rules::default()).unwrap();
        state.block = BlockSet::new(cell_center(8, 8));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Falling { won: true });

        let input = TickInput::default();
        for _ in 0..200 {
            tick(&mut state, &input);
            if state.phase == GamePhase::Playing {
                break;
            }
        }
        assert_eq!(state.level.number, 2);
        assert!((state.block.pos - cell_center(1, 1)).length() < 1e-5);
    }

    #[test]
    fn test_win_without_fall_animation_is_immediate() {
        let rules = Rules {
            finish_fall: false,
            ..Default::default()
        };
        let mut state = GameState::new(rules).unwrap();
        state.block = BlockSet::new(cell_center(8, 8));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.number, 2);
    }

    #[test]
    fn test_winning_last_level_completes_run() {
        let rules = Rules {
            finish_fall: false,
            ..Default::default()
        };
        let mut state = GameState::at_level(LEVEL_COUNT, rules).unwrap();
        state.block = BlockSet::new(cell_center(9, 9));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn test_switch_raises_bridges_in_game() {
        let mut state = GameState::at_level(2, Rules::default()).unwrap();
        state.block = BlockSet::new(cell_center(9, 0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        for row in 2..7 {
            assert!(state.grid.tile(4, row).active);
        }
        // Standing still, the switch must not fire again
        tick(&mut state, &TickInput::default());
        for row in 2..7 {
            assert!(state.grid.tile(4, row).active);
        }
    }

    #[test]
    fn test_restart_returns_to_level_1() {
        let mut state = GameState::at_level(2, Rules::default()).unwrap();
        state.moves = 12;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.level.number, 1);
        assert_eq!(state.moves, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    proptest! {
        /// Exactly one variant stays active and the interpolation angle
        /// stays bounded under arbitrary input sequences.
        #[test]
        fn prop_invariants_hold_under_any_inputs(
            seq in prop::collection::vec((0..4usize, 0..40usize), 0..24)
        ) {
            let directions = [
                Direction::Left,
                Direction::Right,
                Direction::Up,
                Direction::Down,
            ];
            let mut state = GameState::new(Rules::default()).unwrap();
            for (d, settle) in seq {
                press(&mut state, directions[d]);
                for _ in 0..settle {
                    tick(&mut state, &TickInput::default());
                }
                let active = state
                    .block
                    .variants()
                    .iter()
                    .filter(|v| v.active)
                    .count();
                prop_assert_eq!(active, 1);
                if let RollState::Rolling { angle, .. } = state.block.roll {
                    prop_assert!(
                        angle.abs() < state.rules.roll_complete_deg + state.rules.roll_step_deg
                    );
                }
            }
        }
    }
}
