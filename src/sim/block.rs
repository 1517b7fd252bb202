//! Block orientation set and the roll state machine
//!
//! The rolling solid is modeled as three mutually-exclusive variants: one
//! upright (1x1 footprint, two cells tall) and two prone (2x1 along each
//! grid axis). Exactly one variant is active at any instant; a completed
//! roll swaps which one via a lookup table and recomputes its position.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A discrete roll command. Left/Right travel along the X axis (rotating
/// about Y), Up/Down along the Y axis (rotating about X).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Travel axis of a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X = 0,
    Y = 1,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
        }
    }

    /// Sign of the translation along the travel axis
    pub fn travel_sign(self) -> f32 {
        match self {
            Direction::Left | Direction::Down => -1.0,
            Direction::Right | Direction::Up => 1.0,
        }
    }

    /// Sign of the interpolation angle (left/up roll negative)
    pub fn angle_sign(self) -> f32 {
        match self {
            Direction::Left | Direction::Up => -1.0,
            Direction::Right | Direction::Down => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// The three physical poses of the block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Upright = 0,
    ProneX = 1,
    ProneY = 2,
}

impl Orientation {
    /// Footprint as (width, length, height) in world units
    pub fn footprint(self) -> Vec3 {
        match self {
            Orientation::Upright => Vec3::new(BLOCK_SIDE, BLOCK_SIDE, BLOCK_TALL),
            Orientation::ProneX => Vec3::new(BLOCK_TALL, BLOCK_SIDE, BLOCK_SIDE),
            Orientation::ProneY => Vec3::new(BLOCK_SIDE, BLOCK_TALL, BLOCK_SIDE),
        }
    }
}

/// {orientation, travel axis} -> {next orientation, cells moved}.
///
/// Swapped transitions alternate between 1-cell and 2-cell footprints along
/// the travel axis, so the center moves one and a half cells. A prone variant
/// lying perpendicular to the travel axis rolls like a log instead: it keeps
/// its footprint and moves a single cell.
pub const ROLL_TRANSITIONS: [[(Orientation, f32); 2]; 3] = [
    // Upright tips over onto the travel axis
    [
        (Orientation::ProneX, SWAP_STEP_CELLS),
        (Orientation::ProneY, SWAP_STEP_CELLS),
    ],
    // ProneX stands up along X, log-rolls along Y
    [
        (Orientation::Upright, SWAP_STEP_CELLS),
        (Orientation::ProneX, LOG_ROLL_STEP_CELLS),
    ],
    // ProneY log-rolls along X, stands up along Y
    [
        (Orientation::ProneY, LOG_ROLL_STEP_CELLS),
        (Orientation::Upright, SWAP_STEP_CELLS),
    ],
];

/// Roll-in-progress state. A tagged union instead of direction booleans:
/// a roll either isn't happening or has exactly one direction and angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum RollState {
    #[default]
    Idle,
    Rolling { direction: Direction, angle: f32 },
}

/// One orientation variant of the block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub orientation: Orientation,
    /// Continuous position; x/y are the footprint center, z stays 0 (the
    /// rest pivot lifts the body onto the tile tops)
    pub pos: Vec3,
    pub active: bool,
    /// Translation applied before the roll rotation, placing the pivot at
    /// the bottom edge of the footprint in the direction of travel
    pub pivot_offset: Vec3,
    /// Inverse translation applied after the rotation
    pub inv_pivot_offset: Vec3,
}

impl Variant {
    fn new(orientation: Orientation, active: bool) -> Self {
        let mut v = Self {
            orientation,
            pos: Vec3::ZERO,
            active,
            pivot_offset: Vec3::ZERO,
            inv_pivot_offset: Vec3::ZERO,
        };
        v.reset_pivots();
        v
    }

    pub fn footprint(&self) -> Vec3 {
        self.orientation.footprint()
    }

    /// Rest placement: centered, lifted half a height onto the tile tops
    fn reset_pivots(&mut self) {
        self.pivot_offset = Vec3::new(0.0, 0.0, self.footprint().z / 2.0);
        self.inv_pivot_offset = Vec3::new(0.0, 0.0, TILE_TOP);
    }
}

/// The block orientation set: three variants, exactly one active, plus the
/// shared roll state and logical position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSet {
    variants: [Variant; 3],
    pub roll: RollState,
    /// Logical planar position: always equals the active variant's (x, y)
    pub pos: Vec2,
    /// Direction of the most recently completed roll, used to orient the
    /// end-of-level fall tilt
    pub last_roll: Option<Direction>,
}

impl BlockSet {
    /// Create the set standing upright at the given planar position
    pub fn new(start: Vec2) -> Self {
        let mut upright = Variant::new(Orientation::Upright, true);
        upright.pos = Vec3::new(start.x, start.y, 0.0);
        Self {
            variants: [
                upright,
                Variant::new(Orientation::ProneX, false),
                Variant::new(Orientation::ProneY, false),
            ],
            roll: RollState::Idle,
            pos: start,
            last_roll: None,
        }
    }

    pub fn active(&self) -> &Variant {
        &self.variants[self.active_orientation() as usize]
    }

    fn active_mut(&mut self) -> &mut Variant {
        let idx = self.active_orientation() as usize;
        &mut self.variants[idx]
    }

    pub fn active_orientation(&self) -> Orientation {
        // The exactly-one-active invariant is maintained by complete_roll;
        // scan order matches the variant array.
        for v in &self.variants {
            if v.active {
                return v.orientation;
            }
        }
        unreachable!("no active block variant")
    }

    pub fn variant(&self, orientation: Orientation) -> &Variant {
        &self.variants[orientation as usize]
    }

    pub fn variants(&self) -> &[Variant; 3] {
        &self.variants
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.roll, RollState::Rolling { .. })
    }

    /// Current interpolation angles (about X, about Y) in degrees
    pub fn roll_angles(&self) -> (f32, f32) {
        match self.roll {
            RollState::Idle => (0.0, 0.0),
            RollState::Rolling { direction, angle } => match direction.axis() {
                Axis::X => (0.0, angle),
                Axis::Y => (angle, 0.0),
            },
        }
    }

    /// Start a roll. Returns false (and changes nothing) while another roll
    /// is in flight: at most one roll at a time, no queuing.
    pub fn begin_roll(&mut self, direction: Direction) -> bool {
        if self.is_rolling() {
            return false;
        }
        let footprint = self.active().footprint();
        let half_height = footprint.z / 2.0;
        let sign = direction.travel_sign();
        let v = self.active_mut();
        match direction.axis() {
            Axis::X => {
                let half = footprint.x / 2.0;
                v.pivot_offset = Vec3::new(-sign * half, 0.0, half_height);
                v.inv_pivot_offset = Vec3::new(sign * half, 0.0, TILE_TOP);
            }
            Axis::Y => {
                let half = footprint.y / 2.0;
                v.pivot_offset = Vec3::new(0.0, -sign * half, half_height);
                v.inv_pivot_offset = Vec3::new(0.0, sign * half, TILE_TOP);
            }
        }
        self.roll = RollState::Rolling {
            direction,
            angle: 0.0,
        };
        true
    }

    /// Advance the roll interpolation by one tick. Returns true when the
    /// roll completed on this tick (the orientation swap has happened).
    pub fn advance_roll(&mut self, step_deg: f32, complete_deg: f32) -> bool {
        let RollState::Rolling { direction, angle } = self.roll else {
            return false;
        };
        let angle = angle + direction.angle_sign() * step_deg;
        if angle.abs() >= complete_deg {
            self.complete_roll(direction);
            true
        } else {
            self.roll = RollState::Rolling { direction, angle };
            false
        }
    }

    /// Finish a roll: swap (or log-roll) the active variant, step its
    /// position, reset pivots, and republish the logical position. The swap
    /// is atomic: callers never observe zero or two active variants.
    fn complete_roll(&mut self, direction: Direction) {
        let from = self.active_orientation();
        let axis = direction.axis();
        let (next, step_cells) = ROLL_TRANSITIONS[from as usize][axis as usize];
        let delta = direction.travel_sign() * step_cells * CELL_SIZE;

        let from_pos = self.active().pos;
        self.active_mut().reset_pivots();

        if next == from {
            // Log roll: same variant, one-cell step
            let v = self.active_mut();
            match axis {
                Axis::X => v.pos.x += delta,
                Axis::Y => v.pos.y += delta,
            }
        } else {
            self.variants[from as usize].active = false;
            let v = &mut self.variants[next as usize];
            v.active = true;
            v.pos = from_pos;
            match axis {
                Axis::X => v.pos.x += delta,
                Axis::Y => v.pos.y += delta,
            }
        }

        let pos = self.active().pos;
        self.pos = Vec2::new(pos.x, pos.y);
        self.roll = RollState::Idle;
        self.last_roll = Some(direction);
    }
}
