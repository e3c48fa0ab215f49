//! Contact resolution
//!
//! One entry point per contact event. The category pair picks the handler;
//! the body kind picks the obstacle reaction. A body that is already gone
//! (removed earlier in the same step, or a late duplicate event) is a normal
//! occurrence and resolves to `Absent` without touching any state.

use super::actions::Cue;
use super::category::{BALL_BLOCK, BALL_BOUNDS, CollisionCategory};
use super::state::{GameEvent, HitReaction, LevelState, ObstacleKind, Outcome};
use super::world::{BodyId, Contact};

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Pair is not one the game reacts to
    Ignored,
    /// A participant was already removed
    Absent,
    /// An obstacle reacted; white blocks still remain
    ObstacleHit { id: BodyId, kind: ObstacleKind },
    /// The last white block was removed
    LevelCleared { id: BodyId },
    /// The ball left the arena
    ShotEnded(Outcome),
}

/// Resolve a single contact against the level state
pub fn resolve_contact(state: &mut LevelState, contact: &Contact) -> Resolution {
    match contact.pair() {
        BALL_BLOCK => {
            let (block, ball) = if contact.a.category == CollisionCategory::BLOCK {
                (contact.a, contact.b)
            } else {
                (contact.b, contact.a)
            };
            obstacle_hit(state, block.id, ball.id)
        }
        BALL_BOUNDS => {
            let ball = if contact.a.category == CollisionCategory::BALL {
                contact.a
            } else {
                contact.b
            };
            boundary_exit(state, ball.id)
        }
        _ => Resolution::Ignored,
    }
}

fn obstacle_hit(state: &mut LevelState, block_id: BodyId, ball_id: BodyId) -> Resolution {
    let Some(obstacle) = state.registry.get_mut(block_id) else {
        log::trace!("Block {:?} already removed, ignoring contact", block_id);
        return Resolution::Absent;
    };
    let kind = obstacle.kind;

    // Red blocks react to the ball that hit them
    let projectile = state
        .projectile
        .as_mut()
        .filter(|p| p.body == ball_id);

    let Some(reaction) = obstacle.on_hit(projectile) else {
        log::trace!("Ball {:?} already removed, {:?} block ignores contact", ball_id, kind);
        return Resolution::Absent;
    };

    match reaction {
        HitReaction::Shatter => {
            let pos = state.registry.get(block_id).map(|o| o.rect.center());
            state.registry.remove(block_id);
            state.world.remove(block_id);
            if let Some(pos) = pos {
                state.push_event(GameEvent::ObstacleDestroyed { id: block_id, pos });
            }

            let remaining = state.registry.remaining();
            log::debug!("Block count: {}", remaining);

            if remaining == 0 {
                state
                    .actions
                    .schedule(Cue::LevelClear, state.settings.level_clear_cue_delay);
                log::info!("Level {} cleared", state.level_index);
                return Resolution::LevelCleared { id: block_id };
            }
        }
        HitReaction::Toggled { lit } => {
            state.push_event(GameEvent::ObstacleToggled { id: block_id, lit });
        }
        HitReaction::Struck { hits } => {
            state.push_event(GameEvent::ObstacleStruck { id: block_id, hits });
        }
    }

    Resolution::ObstacleHit { id: block_id, kind }
}

fn boundary_exit(state: &mut LevelState, ball_id: BodyId) -> Resolution {
    let is_current = state
        .projectile
        .as_ref()
        .is_some_and(|p| p.body == ball_id);
    if !is_current {
        log::trace!("Ball {:?} already removed, ignoring boundary contact", ball_id);
        return Resolution::Absent;
    }

    let Some(outcome) = state.machine.end_shot(state.registry.remaining()) else {
        return Resolution::Absent;
    };

    state.projectile = None;
    if let Some(body) = state.world.remove(ball_id) {
        state.push_event(GameEvent::ProjectileRemoved { pos: body.pos });
    }

    log::debug!(
        "Ball left the arena with {} blocks remaining: {:?}",
        state.registry.remaining(),
        outcome
    );
    Resolution::ShotEnded(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelAsset, ObstacleDescriptor};
    use crate::settings::Settings;
    use crate::sim::geometry::PlayableRect;
    use crate::sim::state::{LevelPhase, Tint};
    use crate::sim::world::BodyRef;
    use glam::Vec2;
    use proptest::prelude::*;

    fn level(kinds: &[ObstacleKind]) -> LevelState {
        let asset = LevelAsset {
            name: None,
            onboarding: false,
            obstacles: kinds
                .iter()
                .enumerate()
                .map(|(i, &kind)| ObstacleDescriptor::new(kind, Vec2::new(0.1 + 0.1 * i as f32, 0.5)))
                .collect(),
        };
        let playable = PlayableRect::from_screen(Vec2::new(1024.0, 768.0), 4.0 / 3.0).unwrap();
        LevelState::load(0, &asset, playable, &Settings::default())
    }

    fn launched(kinds: &[ObstacleKind]) -> (LevelState, BodyId) {
        let mut state = level(kinds);
        state.machine.begin_aim();
        let ball = state
            .launch(Vec2::new(500.0, 100.0), Vec2::new(500.0, 200.0))
            .unwrap();
        (state, ball)
    }

    fn obstacle_ids(state: &LevelState) -> Vec<BodyId> {
        state.registry.iter().map(|o| o.id).collect()
    }

    fn block_contact(block: BodyId, ball: BodyId) -> Contact {
        Contact::new(
            BodyRef { id: block, category: CollisionCategory::BLOCK },
            BodyRef { id: ball, category: CollisionCategory::BALL },
        )
    }

    fn bounds_contact(state: &LevelState, ball: BodyId) -> Contact {
        let bounds = state
            .world
            .bodies()
            .iter()
            .find(|b| b.category() == CollisionCategory::BOUNDS)
            .map(|b| b.id)
            .unwrap();
        Contact::new(
            BodyRef { id: ball, category: CollisionCategory::BALL },
            BodyRef { id: bounds, category: CollisionCategory::BOUNDS },
        )
    }

    #[test]
    fn test_white_hit_removes_and_decrements() {
        let (mut state, ball) = launched(&[ObstacleKind::White, ObstacleKind::White]);
        let ids = obstacle_ids(&state);

        let result = resolve_contact(&mut state, &block_contact(ids[0], ball));
        assert_eq!(
            result,
            Resolution::ObstacleHit { id: ids[0], kind: ObstacleKind::White }
        );
        assert_eq!(state.registry.remaining(), 1);
        assert!(!state.world.contains(ids[0]));
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleDestroyed { id, .. } if *id == ids[0]))
        );
    }

    #[test]
    fn test_duplicate_contact_is_noop() {
        let (mut state, ball) = launched(&[ObstacleKind::White, ObstacleKind::White]);
        let ids = obstacle_ids(&state);
        let contact = block_contact(ids[0], ball);

        resolve_contact(&mut state, &contact);
        let events = state.events().len();
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::Absent);
        assert_eq!(state.registry.remaining(), 1);
        assert_eq!(state.events().len(), events);
    }

    #[test]
    fn test_last_white_schedules_clear_cue_once() {
        let (mut state, ball) = launched(&[ObstacleKind::White, ObstacleKind::Black]);
        let ids = obstacle_ids(&state);

        let result = resolve_contact(&mut state, &block_contact(ids[0], ball));
        assert_eq!(result, Resolution::LevelCleared { id: ids[0] });
        assert!(state.actions.time_left(Cue::LevelClear).is_some());

        // Black hits afterwards do not reschedule
        resolve_contact(&mut state, &block_contact(ids[1], ball));
        let pending = state.actions.len();
        resolve_contact(&mut state, &block_contact(ids[1], ball));
        assert_eq!(state.actions.len(), pending);
    }

    #[test]
    fn test_black_and_red_keep_count() {
        let (mut state, ball) = launched(&[
            ObstacleKind::White,
            ObstacleKind::Black,
            ObstacleKind::Red,
        ]);
        let ids = obstacle_ids(&state);

        resolve_contact(&mut state, &block_contact(ids[1], ball));
        resolve_contact(&mut state, &block_contact(ids[2], ball));
        assert_eq!(state.registry.remaining(), 1);
        assert!(state.registry.get(ids[1]).unwrap().lit);
        assert_eq!(state.registry.get(ids[2]).unwrap().hits, 1);
        assert_eq!(state.projectile.as_ref().unwrap().tint, Tint::Red);
        assert!(state.world.contains(ids[1]));
    }

    #[test]
    fn test_red_without_ball_is_absent() {
        let mut state = level(&[ObstacleKind::Red]);
        let ids = obstacle_ids(&state);
        let result = resolve_contact(&mut state, &block_contact(ids[0], BodyId(999)));
        assert_eq!(result, Resolution::Absent);
        assert_eq!(state.registry.get(ids[0]).unwrap().hits, 0);
    }

    #[test]
    fn test_boundary_with_remaining_loses() {
        let (mut state, ball) = launched(&[ObstacleKind::White, ObstacleKind::White]);
        let ids = obstacle_ids(&state);
        resolve_contact(&mut state, &block_contact(ids[0], ball));

        let contact = bounds_contact(&state, ball);
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::ShotEnded(Outcome::Lost));
        assert!(state.projectile.is_none());
        assert!(!state.world.contains(ball));
        assert_eq!(state.machine.phase(), LevelPhase::Transitioning);

        // Late duplicate
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::Absent);
        assert_eq!(state.machine.phase(), LevelPhase::Transitioning);
    }

    #[test]
    fn test_boundary_after_clear_wins() {
        let (mut state, ball) = launched(&[ObstacleKind::White, ObstacleKind::Red]);
        let ids = obstacle_ids(&state);
        resolve_contact(&mut state, &block_contact(ids[0], ball));

        let contact = bounds_contact(&state, ball);
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::ShotEnded(Outcome::Won));
    }

    #[test]
    fn test_boundary_order_independent() {
        let (mut state, ball) = launched(&[]);
        let mut contact = bounds_contact(&state, ball);
        std::mem::swap(&mut contact.a, &mut contact.b);
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::ShotEnded(Outcome::Won));
    }

    #[test]
    fn test_unrelated_pair_ignored() {
        let (mut state, _) = launched(&[ObstacleKind::White]);
        let ids = obstacle_ids(&state);
        let contact = Contact::new(
            BodyRef { id: ids[0], category: CollisionCategory::BLOCK },
            BodyRef { id: BodyId(1), category: CollisionCategory::BOUNDS },
        );
        assert_eq!(resolve_contact(&mut state, &contact), Resolution::Ignored);
        assert_eq!(state.registry.remaining(), 1);
    }

    fn kind_strategy() -> impl Strategy<Value = ObstacleKind> {
        prop_oneof![
            Just(ObstacleKind::White),
            Just(ObstacleKind::Black),
            Just(ObstacleKind::Red),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_tracks_white_hits(
            kinds in prop::collection::vec(kind_strategy(), 0..8),
            hits in prop::collection::vec(0usize..8, 0..24),
        ) {
            let (mut state, ball) = launched(&kinds);
            let ids = obstacle_ids(&state);
            prop_assume!(!ids.is_empty());

            for pick in hits {
                let id = ids[pick % ids.len()];
                let kind = state.registry.get(id).map(|o| o.kind);
                let before = state.registry.remaining();
                resolve_contact(&mut state, &block_contact(id, ball));
                let after = state.registry.remaining();
                match kind {
                    Some(ObstacleKind::White) => prop_assert_eq!(after, before - 1),
                    _ => prop_assert_eq!(after, before),
                }
            }
        }

        #[test]
        fn prop_boundary_outcome_matches_remaining(
            kinds in prop::collection::vec(kind_strategy(), 0..8),
            cleared in any::<bool>(),
        ) {
            let (mut state, ball) = launched(&kinds);
            if cleared {
                for id in obstacle_ids(&state) {
                    resolve_contact(&mut state, &block_contact(id, ball));
                }
            }
            let expected = if state.registry.remaining() == 0 { Outcome::Won } else { Outcome::Lost };
            let contact = bounds_contact(&state, ball);
            prop_assert_eq!(resolve_contact(&mut state, &contact), Resolution::ShotEnded(expected));
            prop_assert_eq!(resolve_contact(&mut state, &contact), Resolution::Absent);
        }
    }
}
