//! Ricochet - a single-screen aim-and-launch physics puzzle
//!
//! Core modules:
//! - `sim`: Physics world, obstacle registry, contact resolution and the level state machine
//! - `aim`: Drag gesture to launch vector
//! - `session`: Level session root (lifecycle, pause/resume, fixed-step clock)
//! - `level`: Level assets and providers
//! - `persistence`: Last-level progress store
//! - `manager`: Game manager port (level transitions)
//! - `settings`: Data-driven tuning

pub mod aim;
pub mod level;
pub mod manager;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use aim::{AimController, AimVisual, LaunchRequest};
pub use level::{DirectoryLevels, GeneratedLevels, LevelAsset, LevelProvider, ObstacleDescriptor};
pub use manager::{Director, GameManager, LevelRequest};
pub use persistence::{JsonFileStore, MemoryStore, ProgressStore};
pub use session::LevelSession;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Widest playable aspect ratio (width / height)
    pub const MAX_ASPECT_RATIO: f32 = 4.0 / 3.0;
    /// Boundary loop sits this far outside the playable rect
    pub const BOUNDARY_MARGIN: f32 = 70.0;

    /// Number of levels before progression wraps to 0
    pub const LEVEL_COUNT: usize = 8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 30.0;
    pub const BALL_MASS: f32 = 0.025;
    /// Launch impulse magnitude
    pub const LAUNCH_FORCE: f32 = 20.0;

    /// Obstacle default footprint (full width/height)
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const OBSTACLE_HEIGHT: f32 = 40.0;

    /// Delay before the level-clear cue fires (seconds of sim time)
    pub const LEVEL_CLEAR_CUE_DELAY: f32 = 0.1;

    /// Scene alpha while paused
    pub const PAUSE_DIM_ALPHA: f32 = 0.5;
    /// Cosmetic fade-in after resume (seconds)
    pub const RESUME_FADE_SECS: f32 = 1.5;

    /// Aim marker radius
    pub const AIM_MARKER_RADIUS: f32 = 15.0;
    /// Where aim markers are parked when hidden
    pub const OFFSCREEN: glam::Vec2 = glam::Vec2::new(-100.0, -100.0);
}

/// Launch impulse for a drag from `start` to `end`.
///
/// The ball travels along the drag direction (not opposite to it). A zero-length drag
/// resolves to angle 0 via `atan2(0, 0)`.
#[inline]
pub fn launch_impulse(start: Vec2, end: Vec2, force: f32) -> Vec2 {
    let delta = end - start;
    let angle = delta.y.atan2(delta.x);
    Vec2::new(angle.cos(), angle.sin()) * force
}
