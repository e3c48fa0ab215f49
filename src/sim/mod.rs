//! Simulation module
//!
//! All gameplay logic lives here. This module must stay host-independent:
//! - Fixed timestep only
//! - Contacts are resolved after the physics step, never during it
//! - Stable iteration order (by body ID)
//! - No rendering, audio or platform dependencies

pub mod actions;
pub mod category;
pub mod collision;
pub mod geometry;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod tick;
pub mod world;

pub use actions::{ActionQueue, Cue};
pub use category::CollisionCategory;
pub use collision::{CollisionResult, ball_edge_loop_collision, ball_rect_collision, reflect_velocity};
pub use geometry::{BoundaryShape, PlayableRect, Rect};
pub use registry::ObstacleRegistry;
pub use resolver::{Resolution, resolve_contact};
pub use state::{
    BodyKind, GameEvent, HitReaction, LevelMachine, LevelPhase, LevelState, Obstacle,
    ObstacleKind, Outcome, Projectile, Tint,
};
pub use tick::tick;
pub use world::{BodyId, BodyRef, Contact, PhysicsBody, PhysicsWorld, Shape};
