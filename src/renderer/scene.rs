//! Scene building: game state -> cuboid instances
//!
//! The renderer's only view of the simulation. Each frame the scene builder
//! snapshots the state into a list of cuboid instances (4x4 world transform,
//! half extents, face colors); the pipeline draws them without knowing any
//! game rules.

use glam::{Mat4, Vec3};

use crate::consts::*;
use crate::sim::block::{Axis, Orientation};
use crate::sim::state::{GamePhase, GameState};
use crate::sim::Tile;

use super::mesh::{solid, FaceColors};

/// Colors for game elements
pub mod colors {
    pub const TILE_PLAIN: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
    pub const TILE_SWITCH: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
    pub const TILE_FRAGILE: [f32; 4] = [0.8, 0.45, 0.15, 1.0];
    pub const TILE_BRIDGE: [f32; 4] = [0.25, 0.5, 0.9, 1.0];
    pub const TILE_FINISH: [f32; 4] = [0.15, 0.75, 0.3, 1.0];
    pub const BLOCK_BODY: [f32; 4] = [0.0, 0.3, 1.0, 1.0];
    pub const BLOCK_ACCENT: [f32; 4] = [0.5, 0.5, 0.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

/// One cuboid to draw
#[derive(Debug, Clone)]
pub struct CuboidInstance {
    pub transform: Mat4,
    pub half_extents: Vec3,
    pub faces: FaceColors,
}

/// Fixed overhead camera looking across the board
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        // Diagonal tower view over the board center
        let center = CELL_SIZE * GRID_SIZE as f32 / 2.0;
        Self {
            eye: Vec3::new(-1.0, -1.0, 4.0),
            target: Vec3::new(center, center, 0.0),
            up: Vec3::new(1.0, 1.0, 0.0),
            fov_y: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl Camera {
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect, 0.1, 500.0);
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        proj * view
    }
}

fn tile_color(tile: &Tile) -> [f32; 4] {
    if tile.is_finish {
        colors::TILE_FINISH
    } else if tile.is_switch {
        colors::TILE_SWITCH
    } else if tile.is_bridge {
        colors::TILE_BRIDGE
    } else if tile.is_fragile {
        colors::TILE_FRAGILE
    } else {
        colors::TILE_PLAIN
    }
}

/// Block faces: body color with the two end faces accented, so the active
/// orientation reads at a glance
fn block_faces(orientation: Orientation) -> FaceColors {
    let mut faces = solid(colors::BLOCK_BODY);
    let (a, b) = match orientation {
        Orientation::Upright => (0, 1), // +z / -z
        Orientation::ProneX => (2, 3),  // +x / -x
        Orientation::ProneY => (4, 5),  // +y / -y
    };
    faces[a] = colors::BLOCK_ACCENT;
    faces[b] = colors::BLOCK_ACCENT;
    faces
}

/// World transform of the active block variant, including the roll
/// interpolation and the end-of-level fall
pub fn block_transform(state: &GameState) -> Mat4 {
    let variant = state.block.active();
    let (mut rot_x_deg, mut rot_y_deg) = state.block.roll_angles();

    let mut sink = 0.0;
    if let GamePhase::Falling { .. } = state.phase {
        sink = state.fall.depth;
        // Tip over about the axis of the last completed roll
        if let Some(direction) = state.block.last_roll {
            let tilt = direction.angle_sign() * state.fall.tilt_deg;
            match direction.axis() {
                Axis::X => rot_y_deg += tilt,
                Axis::Y => rot_x_deg += tilt,
            }
        }
    }

    let translate = Mat4::from_translation(Vec3::new(
        variant.pos.x,
        variant.pos.y,
        variant.pos.z - sink,
    ));
    Mat4::from_translation(variant.inv_pivot_offset)
        * translate
        * Mat4::from_rotation_x(rot_x_deg.to_radians())
        * Mat4::from_rotation_y(rot_y_deg.to_radians())
        * Mat4::from_translation(variant.pivot_offset)
}

/// Snapshot the game state into drawable instances
pub fn build(state: &GameState) -> Vec<CuboidInstance> {
    let mut instances = Vec::with_capacity(GRID_SIZE * GRID_SIZE + 1);

    for tile in state.grid.iter() {
        if !tile.active {
            continue;
        }
        instances.push(CuboidInstance {
            transform: Mat4::from_translation(Vec3::new(tile.pos.x, tile.pos.y, 0.0)),
            half_extents: Vec3::new(CELL_SIZE / 2.0, CELL_SIZE / 2.0, TILE_HEIGHT / 2.0),
            faces: solid(tile_color(tile)),
        });
    }

    let variant = state.block.active();
    instances.push(CuboidInstance {
        transform: block_transform(state),
        half_extents: variant.footprint() / 2.0,
        faces: block_faces(variant.orientation),
    });

    instances
}
