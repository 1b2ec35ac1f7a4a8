//! # chaosviz
//!
//! Real-time Lorenz attractor viewer. Click anywhere in the scene to spawn a
//! trajectory; every trajectory is integrated once per frame and drawn as a
//! speed-colored trail.
//!
//! ## Quick Start
//!
//! ```ignore
//! use chaosviz::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     chaosviz::run(ViewerConfig::default())
//! }
//! ```
//!
//! ## Headless use
//!
//! [`Simulation`] has no window or GPU dependency. Drive it with
//! [`Command`]s and read back trajectories or the camera:
//!
//! ```
//! use chaosviz::prelude::*;
//!
//! let config = ViewerConfig { rng_seed: Some(7), ..ViewerConfig::default() };
//! let mut sim = Simulation::new(&config);
//! sim.tick([Command::IncreaseB]);
//! for _ in 0..100 {
//!     sim.step();
//! }
//! assert_eq!(sim.params().b, 29.0);
//! // the tick above also advanced once
//! assert_eq!(sim.trajectories()[0].len(), 102);
//! ```
//!
//! ## Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Left click | Spawn a trajectory under the cursor (free camera) |
//! | Shift + left drag | Rotate (free camera) |
//! | Right drag | Pan (free camera) |
//! | Wheel | Zoom |
//! | `A` / `S` | Increase / decrease `a` |
//! | `D` / `F` | Increase / decrease `b` |
//! | `T` | Toggle follow camera |
//! | `R` | Reset view |
//! | `C` | Clear trajectories |
//! | `P` | Pause |
//! | `Esc` | Quit |
//!
//! ## Logging
//!
//! Uses [`tracing`]. The binary installs a subscriber filtered by `RUST_LOG`,
//! e.g. `RUST_LOG=chaosviz=debug`.

pub mod attractor;
pub mod camera;
pub mod color;
pub mod config;
pub mod error;
mod gpu;
pub mod guard;
pub mod input;
pub mod params;
pub mod picking;
pub mod simulation;
pub mod snapshot;
pub mod time;
pub mod trajectory;
mod window;

pub use attractor::{advance, derivative, Rejection, StepOutcome};
pub use camera::{Camera, CameraConfig, CameraMode, CameraState, FollowCamera, FreeCamera, ViewTransform};
pub use config::ViewerConfig;
pub use error::{ConfigError, GpuError, ViewerError};
pub use glam::{Mat4, Vec2, Vec3};
pub use gpu::{line_vertices, LineVertex};
pub use input::{Command, Input};
pub use params::AttractorParameters;
pub use picking::{unproject, Viewport};
pub use simulation::{Simulation, SimulationState, TickReport};
pub use snapshot::{HeadSnapshot, SnapshotReader};
pub use trajectory::{HistoryPoint, Trajectory};
pub use window::run;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::camera::{CameraConfig, CameraMode};
    pub use crate::config::ViewerConfig;
    pub use crate::error::ViewerError;
    pub use crate::input::Command;
    pub use crate::params::AttractorParameters;
    pub use crate::simulation::{Simulation, TickReport};
    pub use crate::trajectory::Trajectory;
    pub use crate::{Vec2, Vec3};
}
