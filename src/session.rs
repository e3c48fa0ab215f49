//! Level session
//!
//! Root of one level attempt. Owns the simulation clock, routes gesture input
//! through the aim controller, turns a finished shot into exactly one game
//! manager call, and implements pause/resume.
//!
//! Once the shot has ended the session is spent: input, contacts and ticks
//! are ignored. The manager is expected to build a fresh session for whatever
//! level it loads next.

use glam::Vec2;

use crate::aim::{AimController, AimVisual, GesturePhase};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::level::LevelAsset;
use crate::manager::GameManager;
use crate::persistence::ProgressStore;
use crate::settings::Settings;
use crate::sim::{
    BodyId, BoundaryShape, Contact, GameEvent, LevelMachine, LevelPhase, LevelState,
    ObstacleRegistry, Outcome, PhysicsWorld, PlayableRect, Projectile, Resolution,
    resolve_contact, tick,
};

pub struct LevelSession<S: ProgressStore, M: GameManager> {
    state: LevelState,
    aim: AimController,
    store: S,
    manager: M,
    accumulator: f32,
    onboarding: bool,
    outcome: Option<Outcome>,
}

impl<S: ProgressStore, M: GameManager> LevelSession<S, M> {
    /// Start `asset` as level `level_index` on a screen of `screen` size
    pub fn new(
        level_index: usize,
        asset: &LevelAsset,
        screen: Vec2,
        settings: &Settings,
        store: S,
        manager: M,
    ) -> anyhow::Result<Self> {
        settings.validate()?;
        anyhow::ensure!(
            level_index < settings.level_count,
            "level {} out of range (0..{})",
            level_index,
            settings.level_count
        );
        let playable = PlayableRect::from_screen(screen, settings.max_aspect_ratio)
            .ok_or_else(|| anyhow::anyhow!("screen {:?} has no playable area", screen))?;

        let state = LevelState::load(level_index, asset, playable, settings);

        Ok(Self {
            state,
            aim: AimController::new(),
            store,
            manager,
            accumulator: 0.0,
            onboarding: asset.onboarding,
            outcome: None,
        })
    }

    // === Accessors ===

    pub fn level_index(&self) -> usize {
        self.state.level_index
    }

    pub fn phase(&self) -> LevelPhase {
        self.state.machine.phase()
    }

    pub fn machine(&self) -> &LevelMachine {
        &self.state.machine
    }

    pub fn remaining_obstacles(&self) -> u32 {
        self.state.registry.remaining()
    }

    pub fn registry(&self) -> &ObstacleRegistry {
        &self.state.registry
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.state.world
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.state.projectile.as_ref()
    }

    pub fn projectile_pos(&self) -> Option<Vec2> {
        self.state.projectile_pos()
    }

    pub fn playable(&self) -> &PlayableRect {
        &self.state.playable
    }

    pub fn boundary(&self) -> &BoundaryShape {
        &self.state.boundary
    }

    pub fn aim_visual(&self) -> &AimVisual {
        self.aim.visual()
    }

    pub fn is_paused(&self) -> bool {
        !self.state.machine.is_running()
    }

    /// Won or Lost has been reached and the manager notified
    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Hand the ports back to the host
    pub fn into_parts(self) -> (S, M) {
        (self.store, self.manager)
    }

    /// Presentation events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    // === Input ===

    pub fn handle_gesture(&mut self, phase: GesturePhase, pos: Vec2) {
        match phase {
            GesturePhase::Began => self.pointer_began(pos),
            GesturePhase::Changed => self.pointer_moved(pos),
            GesturePhase::Ended => self.pointer_ended(),
        }
    }

    pub fn pointer_began(&mut self, pos: Vec2) {
        if self.is_ended() {
            return;
        }
        if self.onboarding {
            self.onboarding = false;
            self.state.push_event(GameEvent::OnboardingDismissed);
        }
        self.aim.begin(pos, &mut self.state.machine);
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.is_ended() {
            return;
        }
        if let Some(visual) = self.aim.change(pos, &mut self.state.machine) {
            if let Some((start, end)) = visual.line {
                self.state.push_event(GameEvent::AimUpdated { start, end });
            }
        }
    }

    pub fn pointer_ended(&mut self) {
        if self.is_ended() {
            return;
        }
        if let Some(request) = self.aim.end(&self.state.machine) {
            self.state.push_event(GameEvent::AimCleared);
            self.state.launch(request.origin, request.target);
        }
    }

    /// Launch toward `target` without a drag. Needs the pointer down (`Aiming`)
    /// and is refused while a shot is in flight.
    pub fn launch(&mut self, origin: Vec2, target: Vec2) -> Option<BodyId> {
        if self.is_ended() {
            return None;
        }
        self.state.launch(origin, target)
    }

    // === Simulation ===

    /// Advance by a frame's worth of real time using fixed substeps
    pub fn tick(&mut self, frame_dt: f32) {
        if self.is_ended() {
            return;
        }
        self.accumulator += frame_dt.max(0.0);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            if let Some(outcome) = tick(&mut self.state, SIM_DT) {
                self.finish(outcome);
                return;
            }
        }
        if substeps == MAX_SUBSTEPS {
            // Spiral of death guard: drop the backlog
            self.accumulator = 0.0;
        }
    }

    /// Resolve a contact reported by an external physics step
    pub fn resolve_contact(&mut self, contact: &Contact) -> Resolution {
        if self.is_ended() {
            return Resolution::Absent;
        }
        let resolution = resolve_contact(&mut self.state, contact);
        if let Resolution::ShotEnded(outcome) = resolution {
            self.finish(outcome);
        }
        resolution
    }

    fn finish(&mut self, outcome: Outcome) {
        let level = self.state.level_index;
        match outcome {
            Outcome::Won => {
                log::info!("Win!");
                // Past the final level, loop back to the first
                let next = (level + 1) % self.state.settings.level_count;
                self.store.set_last_level(next);
                self.manager.load_level(next, true);
            }
            Outcome::Lost => {
                log::info!("Lose!");
                self.manager.reload_level(level);
            }
        }
        self.state.machine.conclude(outcome);
        self.outcome = Some(outcome);
        self.state.push_event(GameEvent::LevelEnded { level, outcome });
    }

    // === Pause / resume ===

    /// Freeze physics and timed cues. No-op if already paused.
    pub fn pause(&mut self) {
        if self.state.pause() {
            log::info!("Paused");
            let dim_alpha = self.state.settings.pause_dim_alpha;
            self.state.push_event(GameEvent::Paused { dim_alpha });
        }
    }

    /// Restore full speed immediately; the fade-in is presentation only
    pub fn resume(&mut self) {
        if self.state.resume() {
            log::info!("Resumed");
            let fade_secs = self.state.settings.resume_fade_secs;
            self.state.push_event(GameEvent::Resumed { fade_secs });
        }
    }
}
