//! Minimal 2D physics world
//!
//! Zero gravity by default, one dynamic circle (the ball), static boxes and an
//! edge loop. `step` integrates, resolves overlaps and reports contacts that
//! *began* during the step. Reported contacts are handed back to the caller;
//! nothing here calls out while stepping.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::CollisionCategory;
use super::collision::{ball_edge_loop_collision, ball_rect_collision, bounce_velocity};
use super::geometry::Rect;
use super::state::{BodyKind, ObstacleKind};

/// Stable body handle (never reused within a world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Solid axis-aligned box centered on the body position
    Box { half_extents: Vec2 },
    /// Hollow rectangle; dynamic bodies live inside it
    EdgeLoop { rect: Rect },
}

/// A body in the world
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0 for static bodies
    pub inv_mass: f32,
    /// Sensors report contacts but never push the ball
    pub sensor: bool,
    /// Categories this body reports contacts with
    pub contact_mask: CollisionCategory,
}

impl PhysicsBody {
    #[inline]
    pub fn category(&self) -> CollisionCategory {
        self.kind.category()
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.inv_mass > 0.0
    }

    #[inline]
    pub fn body_ref(&self) -> BodyRef {
        BodyRef {
            id: self.id,
            category: self.category(),
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse * self.inv_mass;
    }
}

/// One participant of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyRef {
    pub id: BodyId,
    pub category: CollisionCategory,
}

/// A contact that began during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
    pub point: Vec2,
    pub normal: Vec2,
}

impl Contact {
    pub fn new(a: BodyRef, b: BodyRef) -> Self {
        Self {
            a,
            b,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
        }
    }

    /// Category pair (order independent)
    #[inline]
    pub fn pair(&self) -> CollisionCategory {
        self.a.category | self.b.category
    }

    fn key(&self) -> (BodyId, BodyId) {
        if self.a.id <= self.b.id {
            (self.a.id, self.b.id)
        } else {
            (self.b.id, self.a.id)
        }
    }
}

/// The physics world and its clock
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: Vec<PhysicsBody>,
    next_id: u32,
    /// Simulation speed multiplier (0 = stopped)
    speed: f32,
    gravity: Vec2,
    restitution: f32,
    /// Scaled simulation seconds elapsed
    elapsed: f32,
    /// Pairs overlapping at the end of the last step
    touching: HashSet<(BodyId, BodyId)>,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec2, restitution: f32) -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
            speed: 1.0,
            gravity,
            restitution,
            elapsed: 0.0,
            touching: HashSet::new(),
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, kind: BodyKind, shape: Shape, pos: Vec2, inv_mass: f32, sensor: bool) -> BodyId {
        let id = self.allocate_id();
        let contact_mask = match kind {
            BodyKind::Ball => CollisionCategory::BLOCK | CollisionCategory::BOUNDS,
            BodyKind::Obstacle(_) | BodyKind::Boundary => CollisionCategory::BALL,
        };
        self.bodies.push(PhysicsBody {
            id,
            kind,
            shape,
            pos,
            vel: Vec2::ZERO,
            inv_mass,
            sensor,
            contact_mask,
        });
        id
    }

    /// Spawn the dynamic ball
    pub fn spawn_ball(&mut self, pos: Vec2, radius: f32, mass: f32) -> BodyId {
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 1.0 };
        self.insert(BodyKind::Ball, Shape::Circle { radius }, pos, inv_mass, false)
    }

    /// Spawn a static obstacle box
    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, rect: Rect, solid: bool) -> BodyId {
        self.insert(
            BodyKind::Obstacle(kind),
            Shape::Box {
                half_extents: rect.half_extents(),
            },
            rect.center(),
            0.0,
            !solid,
        )
    }

    /// Spawn the boundary edge loop
    pub fn spawn_boundary(&mut self, rect: Rect) -> BodyId {
        self.insert(
            BodyKind::Boundary,
            Shape::EdgeLoop { rect },
            rect.center(),
            0.0,
            false,
        )
    }

    /// Remove a body; `None` if it was already gone
    pub fn remove(&mut self, id: BodyId) -> Option<PhysicsBody> {
        let idx = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(idx))
    }

    pub fn get(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    /// Apply an impulse to a dynamic body. Returns false if the body is gone.
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) -> bool {
        match self.get_mut(id) {
            Some(body) => {
                body.apply_impulse(impulse);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` seconds scaled by the world speed.
    ///
    /// Returns contacts that began this step, in body order.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let dt = dt * self.speed;
        let mut contacts = Vec::new();
        if dt <= 0.0 {
            return contacts;
        }
        self.elapsed += dt;

        let mut touching = HashSet::new();

        for i in 0..self.bodies.len() {
            let (radius, this) = match self.bodies[i].shape {
                Shape::Circle { radius } if self.bodies[i].is_dynamic() => {
                    (radius, self.bodies[i].body_ref())
                }
                _ => continue,
            };
            let mask = self.bodies[i].contact_mask;
            let mut vel = self.bodies[i].vel + self.gravity * dt;
            let mut pos = self.bodies[i].pos + vel * dt;

            for (j, other) in self.bodies.iter().enumerate() {
                if j == i || !mask.intersects(other.category()) {
                    continue;
                }
                let result = match other.shape {
                    Shape::Box { half_extents } => ball_rect_collision(
                        pos,
                        radius,
                        &Rect::from_center_size(other.pos, half_extents * 2.0),
                    ),
                    Shape::EdgeLoop { rect } => ball_edge_loop_collision(pos, radius, &rect),
                    // Only one ball is ever in flight
                    Shape::Circle { .. } => continue,
                };
                if !result.hit {
                    continue;
                }

                if !other.sensor {
                    pos += result.normal * result.penetration;
                    vel = bounce_velocity(vel, result.normal, self.restitution);
                }

                let contact = Contact {
                    a: this,
                    b: other.body_ref(),
                    point: result.point,
                    normal: result.normal,
                };
                let key = contact.key();
                if other.sensor {
                    // Sensors stay overlapped; only the first step reports
                    touching.insert(key);
                }
                if !self.touching.contains(&key) {
                    contacts.push(contact);
                }
            }

            let body = &mut self.bodies[i];
            body.pos = pos;
            body.vel = vel;
        }

        self.touching = touching;
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Rect {
        Rect::from_origin_size(Vec2::ZERO, Vec2::new(1000.0, 800.0))
    }

    #[test]
    fn test_impulse_sets_velocity() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let ball = world.spawn_ball(Vec2::new(100.0, 100.0), 10.0, 0.5);
        assert!(world.apply_impulse(ball, Vec2::new(10.0, 0.0)));
        assert_eq!(world.get(ball).unwrap().vel, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_step_moves_ball() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let ball = world.spawn_ball(Vec2::new(100.0, 100.0), 10.0, 1.0);
        world.apply_impulse(ball, Vec2::new(120.0, 0.0));
        let contacts = world.step(0.5);
        assert!(contacts.is_empty());
        assert!((world.get(ball).unwrap().pos.x - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_speed_freezes_world() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let ball = world.spawn_ball(Vec2::new(100.0, 100.0), 10.0, 1.0);
        world.apply_impulse(ball, Vec2::new(120.0, 0.0));
        world.set_speed(0.0);
        for _ in 0..100 {
            assert!(world.step(1.0 / 120.0).is_empty());
        }
        assert_eq!(world.get(ball).unwrap().pos, Vec2::new(100.0, 100.0));
        assert_eq!(world.elapsed(), 0.0);
    }

    #[test]
    fn test_boundary_contact_reported() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let bounds = world.spawn_boundary(arena());
        let ball = world.spawn_ball(Vec2::new(500.0, 400.0), 10.0, 1.0);
        world.apply_impulse(ball, Vec2::new(600.0, 0.0));

        let mut seen = None;
        for _ in 0..240 {
            if let Some(c) = world.step(1.0 / 120.0).into_iter().next() {
                seen = Some(c);
                break;
            }
        }
        let contact = seen.expect("ball should reach the right wall");
        assert_eq!(contact.a.id, ball);
        assert_eq!(contact.b.id, bounds);
        assert_eq!(contact.pair(), CollisionCategory::BALL | CollisionCategory::BOUNDS);
    }

    #[test]
    fn test_solid_block_bounces_ball() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let rect = Rect::from_center_size(Vec2::new(300.0, 100.0), Vec2::new(40.0, 200.0));
        let block = world.spawn_obstacle(ObstacleKind::Black, rect, true);
        let ball = world.spawn_ball(Vec2::new(200.0, 100.0), 10.0, 1.0);
        world.apply_impulse(ball, Vec2::new(300.0, 0.0));

        let mut hits = 0;
        for _ in 0..120 {
            for c in world.step(1.0 / 120.0) {
                assert_eq!(c.b.id, block);
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
        assert!(world.get(ball).unwrap().vel.x < 0.0);
    }

    #[test]
    fn test_sensor_reports_once_and_lets_ball_through() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let rect = Rect::from_center_size(Vec2::new(300.0, 100.0), Vec2::new(100.0, 100.0));
        world.spawn_obstacle(ObstacleKind::White, rect, false);
        let ball = world.spawn_ball(Vec2::new(200.0, 100.0), 10.0, 1.0);
        world.apply_impulse(ball, Vec2::new(300.0, 0.0));

        let mut hits = 0;
        for _ in 0..120 {
            hits += world.step(1.0 / 120.0).len();
        }
        assert_eq!(hits, 1);
        let body = world.get(ball).unwrap();
        assert!(body.vel.x > 0.0);
        assert!(body.pos.x > 360.0);
    }

    #[test]
    fn test_balls_pass_through_each_other() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let a = world.spawn_ball(Vec2::new(100.0, 100.0), 10.0, 1.0);
        let b = world.spawn_ball(Vec2::new(105.0, 100.0), 10.0, 1.0);
        world.apply_impulse(a, Vec2::new(60.0, 0.0));

        assert!(world.step(1.0 / 120.0).is_empty());
        assert!(world.get(a).unwrap().vel.x > 0.0);
        assert_eq!(world.get(b).unwrap().pos, Vec2::new(105.0, 100.0));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut world = PhysicsWorld::new(Vec2::ZERO, 1.0);
        let ball = world.spawn_ball(Vec2::ZERO, 10.0, 1.0);
        assert!(world.remove(ball).is_some());
        assert!(world.remove(ball).is_none());
        assert!(!world.apply_impulse(ball, Vec2::X));
    }
}
