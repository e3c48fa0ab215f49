//! Level state and core simulation types
//!
//! Everything one level attempt mutates lives in [`LevelState`]: the physics
//! world, the obstacle registry, the in-flight projectile, the level state
//! machine and the timed-cue queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actions::{ActionQueue, Cue};
use super::category::CollisionCategory;
use super::geometry::{BoundaryShape, PlayableRect, Rect};
use super::registry::ObstacleRegistry;
use super::world::{BodyId, PhysicsWorld};
use crate::launch_impulse;
use crate::level::LevelAsset;
use crate::settings::Settings;

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Shatters on first hit; must be cleared to win
    White,
    /// Toggles on hit, never removed
    Black,
    /// Reacts to the projectile that struck it, never removed
    Red,
}

impl ObstacleKind {
    /// Returns true if this obstacle must be destroyed to clear the level
    pub fn counts_for_clear(self) -> bool {
        self == ObstacleKind::White
    }
}

/// What a physics body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Ball,
    Obstacle(ObstacleKind),
    Boundary,
}

impl BodyKind {
    /// The single category bit for this kind of body
    pub fn category(self) -> CollisionCategory {
        match self {
            BodyKind::Ball => CollisionCategory::BALL,
            BodyKind::Obstacle(_) => CollisionCategory::BLOCK,
            BodyKind::Boundary => CollisionCategory::BOUNDS,
        }
    }
}

/// Projectile tint (changed by red obstacles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    Plain,
    Red,
}

/// The ball under player control
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: BodyId,
    pub radius: f32,
    pub tint: Tint,
}

/// What an obstacle did in response to a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReaction {
    /// Remove from the simulation
    Shatter,
    /// Black block flipped its lit state
    Toggled { lit: bool },
    /// Red block registered a strike
    Struck { hits: u32 },
}

/// A live obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: BodyId,
    pub kind: ObstacleKind,
    pub rect: Rect,
    /// Black blocks: current toggle state
    pub lit: bool,
    /// Times this obstacle has been struck
    pub hits: u32,
}

impl Obstacle {
    pub fn new(id: BodyId, kind: ObstacleKind, rect: Rect) -> Self {
        Self {
            id,
            kind,
            rect,
            lit: false,
            hits: 0,
        }
    }

    /// Apply this obstacle's on-hit behavior
    ///
    /// Red blocks need the projectile; without one they do nothing.
    pub fn on_hit(&mut self, projectile: Option<&mut Projectile>) -> Option<HitReaction> {
        match self.kind {
            ObstacleKind::White => {
                self.hits += 1;
                Some(HitReaction::Shatter)
            }
            ObstacleKind::Black => {
                self.hits += 1;
                self.lit = !self.lit;
                Some(HitReaction::Toggled { lit: self.lit })
            }
            ObstacleKind::Red => {
                let projectile = projectile?;
                self.hits += 1;
                projectile.tint = Tint::Red;
                Some(HitReaction::Struck { hits: self.hits })
            }
        }
    }
}

/// Level lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Waiting for the first touch
    Idle,
    /// Finger down, aim being defined
    Aiming,
    /// Ball launched and moving
    ShotInFlight,
    /// Ball left the arena, outcome being decided
    Transitioning,
    /// Terminal: all white blocks cleared
    Won,
    /// Terminal: white blocks remained
    Lost,
}

/// Terminal outcome of a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Level state machine
///
/// `shooting_in_progress` and `transitioning` are derived from the phase so the
/// two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelMachine {
    phase: LevelPhase,
    accepting_new_aim: bool,
    running: bool,
}

impl Default for LevelMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelMachine {
    pub fn new() -> Self {
        Self {
            phase: LevelPhase::Idle,
            accepting_new_aim: false,
            running: true,
        }
    }

    #[inline]
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    #[inline]
    pub fn shooting_in_progress(&self) -> bool {
        self.phase == LevelPhase::ShotInFlight
    }

    #[inline]
    pub fn transitioning(&self) -> bool {
        matches!(
            self.phase,
            LevelPhase::Transitioning | LevelPhase::Won | LevelPhase::Lost
        )
    }

    #[inline]
    pub fn accepting_new_aim(&self) -> bool {
        self.accepting_new_aim
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Won or Lost
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, LevelPhase::Won | LevelPhase::Lost)
    }

    /// Guard shared by aim drawing and launching
    pub fn can_aim(&self) -> bool {
        !self.shooting_in_progress() && self.accepting_new_aim && !self.transitioning()
    }

    /// Pointer went down
    pub fn begin_aim(&mut self) {
        self.accepting_new_aim = true;
        if self.phase == LevelPhase::Idle {
            self.phase = LevelPhase::Aiming;
        }
    }

    /// Drop the current aim (a shot is in flight)
    pub fn reject_aim(&mut self) {
        self.accepting_new_aim = false;
    }

    /// `Aiming -> ShotInFlight`. Refused without a live aim.
    pub fn begin_shot(&mut self) -> bool {
        if self.phase != LevelPhase::Aiming || !self.can_aim() {
            return false;
        }
        self.phase = LevelPhase::ShotInFlight;
        true
    }

    /// Ball reached the boundary: enter `Transitioning` and decide the outcome.
    ///
    /// Returns `None` if no shot was in flight.
    pub fn end_shot(&mut self, remaining_obstacles: u32) -> Option<Outcome> {
        if self.phase != LevelPhase::ShotInFlight {
            return None;
        }
        self.phase = LevelPhase::Transitioning;
        Some(if remaining_obstacles == 0 {
            Outcome::Won
        } else {
            Outcome::Lost
        })
    }

    /// Settle into the terminal phase
    pub fn conclude(&mut self, outcome: Outcome) {
        if self.phase == LevelPhase::Transitioning {
            self.phase = match outcome {
                Outcome::Won => LevelPhase::Won,
                Outcome::Lost => LevelPhase::Lost,
            };
        }
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

/// Presentation events drained by the host (renderer / audio)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: usize, white_obstacles: u32 },
    /// Level 0 demo hint should disappear
    OnboardingDismissed,
    AimUpdated { start: Vec2, end: Vec2 },
    AimCleared,
    Launched { origin: Vec2, impulse: Vec2 },
    /// White block shattered (explosion + sound)
    ObstacleDestroyed { id: BodyId, pos: Vec2 },
    ObstacleToggled { id: BodyId, lit: bool },
    ObstacleStruck { id: BodyId, hits: u32 },
    ProjectileRemoved { pos: Vec2 },
    Cue(Cue),
    LevelEnded { level: usize, outcome: Outcome },
    Paused { dim_alpha: f32 },
    Resumed { fade_secs: f32 },
}

/// Complete state of one level attempt
#[derive(Debug, Clone)]
pub struct LevelState {
    pub level_index: usize,
    pub world: PhysicsWorld,
    pub registry: ObstacleRegistry,
    pub projectile: Option<Projectile>,
    pub machine: LevelMachine,
    pub actions: ActionQueue,
    pub playable: PlayableRect,
    pub boundary: BoundaryShape,
    pub settings: Settings,
    events: Vec<GameEvent>,
}

impl LevelState {
    /// Build the world for `asset` inside `playable`
    pub fn load(
        level_index: usize,
        asset: &LevelAsset,
        playable: PlayableRect,
        settings: &Settings,
    ) -> Self {
        let boundary = BoundaryShape::around(&playable, settings.boundary_margin);
        let mut world = PhysicsWorld::new(Vec2::ZERO, settings.restitution);
        world.spawn_boundary(*boundary.rect());

        let mut obstacles = Vec::with_capacity(asset.obstacles.len());
        for desc in &asset.obstacles {
            let center = playable.rect().denormalize(desc.pos);
            let rect = Rect::from_center_size(center, desc.size);
            // White blocks shatter on contact, the ball passes through them
            let solid = !desc.kind.counts_for_clear();
            let id = world.spawn_obstacle(desc.kind, rect, solid);
            obstacles.push(Obstacle::new(id, desc.kind, rect));
        }
        let registry = ObstacleRegistry::load(obstacles);

        log::info!("Current level: {}", level_index);
        log::info!(
            "Number of blocks in level {}: {} ({} total obstacles)",
            level_index,
            registry.remaining(),
            registry.len()
        );

        let mut actions = ActionQueue::new();
        actions.schedule(Cue::LevelStart, 0.0);

        let mut state = Self {
            level_index,
            world,
            registry,
            projectile: None,
            machine: LevelMachine::new(),
            actions,
            playable,
            boundary,
            settings: settings.clone(),
            events: Vec::new(),
        };
        state.push_event(GameEvent::LevelStarted {
            level: level_index,
            white_obstacles: state.registry.remaining(),
        });
        state
    }

    /// Launch a ball from `origin` in the direction of `target`.
    ///
    /// Refused (no projectile, no state change) unless an aim is live.
    pub fn launch(&mut self, origin: Vec2, target: Vec2) -> Option<BodyId> {
        if self.projectile.is_some() || !self.machine.begin_shot() {
            log::debug!("Launch refused in phase {:?}", self.machine.phase());
            return None;
        }

        let radius = self.settings.ball_radius;
        let body = self
            .world
            .spawn_ball(origin, radius, self.settings.ball_mass);
        let impulse = launch_impulse(origin, target, self.settings.launch_force);
        self.world.apply_impulse(body, impulse);
        self.projectile = Some(Projectile {
            body,
            radius,
            tint: Tint::Plain,
        });

        log::debug!("Ball launched from {:?} with impulse {:?}", origin, impulse);
        self.push_event(GameEvent::Launched { origin, impulse });
        Some(body)
    }

    /// Current projectile position, if one is in flight
    pub fn projectile_pos(&self) -> Option<Vec2> {
        let projectile = self.projectile.as_ref()?;
        self.world.get(projectile.body).map(|b| b.pos)
    }

    /// Stop the simulation clock and timed actions
    pub fn pause(&mut self) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        self.machine.set_running(false);
        self.world.set_speed(0.0);
        self.actions.set_paused(true);
        true
    }

    /// Restore the simulation clock and timed actions
    pub fn resume(&mut self) -> bool {
        if self.machine.is_running() {
            return false;
        }
        self.machine.set_running(true);
        self.world.set_speed(1.0);
        self.actions.set_paused(false);
        true
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
