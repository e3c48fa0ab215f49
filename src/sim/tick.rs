//! Fixed timestep simulation tick
//!
//! One physics step, then every contact that began during it is resolved,
//! then timed cues advance by the same scaled time. Contacts are never
//! resolved while the world is stepping.

use super::category::BALL_BOUNDS;
use super::resolver::{Resolution, resolve_contact};
use super::state::{GameEvent, LevelState, Outcome};

/// Advance the level by one fixed timestep.
///
/// Returns the shot outcome if the ball left the arena during this step.
pub fn tick(state: &mut LevelState, dt: f32) -> Option<Outcome> {
    let mut contacts = state.world.step(dt);
    // Block hits first so the exit check sees every block this step cleared
    contacts.sort_by_key(|c| c.pair() == BALL_BOUNDS);

    let mut outcome = None;
    for contact in &contacts {
        log::trace!("Contact {:?} <-> {:?}", contact.a, contact.b);
        if let Resolution::ShotEnded(o) = resolve_contact(state, contact) {
            outcome = Some(o);
        }
    }

    let scaled = dt * state.world.speed();
    for cue in state.actions.advance(scaled) {
        log::debug!("Cue fired: {:?}", cue);
        state.push_event(GameEvent::Cue(cue));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::{LevelAsset, ObstacleDescriptor};
    use crate::settings::Settings;
    use crate::sim::actions::Cue;
    use crate::sim::geometry::PlayableRect;
    use crate::sim::state::{LevelPhase, ObstacleKind};
    use glam::Vec2;

    fn screen_level(obstacles: Vec<ObstacleDescriptor>) -> LevelState {
        let asset = LevelAsset {
            name: None,
            onboarding: false,
            obstacles,
        };
        let playable = PlayableRect::from_screen(Vec2::new(1024.0, 768.0), 4.0 / 3.0).unwrap();
        LevelState::load(3, &asset, playable, &Settings::default())
    }

    fn run_until_outcome(state: &mut LevelState, max_ticks: usize) -> Option<Outcome> {
        for _ in 0..max_ticks {
            if let Some(outcome) = tick(state, SIM_DT) {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_level_start_cue_fires_on_first_tick() {
        let mut state = screen_level(Vec::new());
        tick(&mut state, SIM_DT);
        assert!(state.events().contains(&GameEvent::Cue(Cue::LevelStart)));
    }

    #[test]
    fn test_shot_through_white_blocks_wins() {
        // Column of white blocks straight above the launch point
        let mut state = screen_level(vec![
            ObstacleDescriptor::new(ObstacleKind::White, Vec2::new(0.5, 0.4)),
            ObstacleDescriptor::new(ObstacleKind::White, Vec2::new(0.5, 0.7)),
        ]);
        let origin = state.playable.rect().denormalize(Vec2::new(0.5, 0.1));
        state.machine.begin_aim();
        state.launch(origin, origin + Vec2::Y * 50.0).unwrap();

        assert_eq!(run_until_outcome(&mut state, 2000), Some(Outcome::Won));
        assert!(state.registry.is_cleared());
        assert_eq!(state.machine.phase(), LevelPhase::Transitioning);
        assert!(state.events().contains(&GameEvent::Cue(Cue::LevelClear)));
    }

    #[test]
    fn test_missed_shot_loses() {
        let mut state = screen_level(vec![ObstacleDescriptor::new(
            ObstacleKind::White,
            Vec2::new(0.9, 0.9),
        )]);
        let origin = state.playable.rect().denormalize(Vec2::new(0.1, 0.5));
        state.machine.begin_aim();
        // Straight left, away from the block
        state.launch(origin, origin - Vec2::X * 50.0).unwrap();

        assert_eq!(run_until_outcome(&mut state, 2000), Some(Outcome::Lost));
        assert_eq!(state.registry.remaining(), 1);
        assert!(state.projectile.is_none());
    }

    #[test]
    fn test_black_block_bounces_ball_back() {
        let mut state = screen_level(vec![ObstacleDescriptor::new(
            ObstacleKind::Black,
            Vec2::new(0.5, 0.6),
        )]);
        let origin = state.playable.rect().denormalize(Vec2::new(0.5, 0.2));
        state.machine.begin_aim();
        let ball = state.launch(origin, origin + Vec2::Y * 10.0).unwrap();

        let mut bounced = false;
        for _ in 0..2000 {
            if let Some(body) = state.world.get(ball) {
                if body.vel.y < 0.0 {
                    bounced = true;
                }
            }
            if tick(&mut state, SIM_DT).is_some() {
                break;
            }
        }
        assert!(bounced);
        assert!(state.events().iter().any(|e| matches!(e, GameEvent::ObstacleToggled { lit: true, .. })));
    }

    #[test]
    fn test_last_block_and_exit_in_same_step_wins() {
        // Block straddles the playable bottom edge; the ball starts inside the margin
        let mut state = screen_level(vec![ObstacleDescriptor::new(
            ObstacleKind::White,
            Vec2::new(0.5, 0.0),
        )]);
        let origin = Vec2::new(512.0, -42.0);
        state.machine.begin_aim();
        state.launch(origin, origin - Vec2::Y).unwrap();

        assert_eq!(tick(&mut state, SIM_DT), Some(Outcome::Won));
        assert!(state.registry.is_cleared());
        assert!(state.projectile.is_none());
    }

    #[test]
    fn test_paused_tick_is_frozen() {
        let mut state = screen_level(Vec::new());
        let origin = state.playable.rect().center();
        state.machine.begin_aim();
        state.launch(origin, origin + Vec2::X).unwrap();
        state.pause();
        for _ in 0..500 {
            assert_eq!(tick(&mut state, SIM_DT), None);
        }
        assert_eq!(state.projectile_pos(), Some(origin));
        assert_eq!(state.machine.phase(), LevelPhase::ShotInFlight);
    }
}
