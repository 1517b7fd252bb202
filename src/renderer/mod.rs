//! WebGPU rendering module
//!
//! The simulation is drawn as colored cuboids: one per active tile plus the
//! active block variant. `scene` snapshots game state into instances,
//! `pipeline` uploads and draws them.

pub mod mesh;
pub mod pipeline;
pub mod scene;

pub use pipeline::RenderState;
pub use scene::{build, Camera, CuboidInstance};
