//! Collision detection and response
//!
//! The ball is the only dynamic body. It is tested against solid axis-aligned
//! blocks (ball outside the box) and against the boundary edge loop (ball
//! inside the box). Both produce a normal pointing toward the ball center.

use glam::Vec2;

use super::geometry::Rect;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a solid axis-aligned box
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    let closest = ball_pos.clamp(rect.min, rect.max);
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-8 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center is inside the box (tunneling) - push out along the shallowest axis
    let to_min = ball_pos - rect.min;
    let to_max = rect.max - ball_pos;
    let candidates = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = candidates
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::Y));

    CollisionResult {
        hit: true,
        point: ball_pos + normal * depth,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Check collision between a ball and the inside of an edge loop
///
/// Reports the deepest edge when the ball crosses a corner.
pub fn ball_edge_loop_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rect) -> CollisionResult {
    let edges = [
        (rect.min.x - (ball_pos.x - ball_radius), Vec2::X),
        ((ball_pos.x + ball_radius) - rect.max.x, Vec2::NEG_X),
        (rect.min.y - (ball_pos.y - ball_radius), Vec2::Y),
        ((ball_pos.y + ball_radius) - rect.max.y, Vec2::NEG_Y),
    ];

    let deepest = edges
        .into_iter()
        .filter(|(penetration, _)| *penetration > 0.0)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    match deepest {
        Some((penetration, normal)) => CollisionResult {
            hit: true,
            point: ball_pos - normal * ball_radius,
            normal,
            penetration,
        },
        None => CollisionResult::miss(),
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect with restitution applied to the normal component only
///
/// `restitution = 1.0` is a perfect bounce and matches `reflect_velocity`.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        // Already separating
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}
