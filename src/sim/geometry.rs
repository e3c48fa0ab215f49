//! Play-area geometry
//!
//! The playable rect is the largest 4:3 band that fits the screen width,
//! centered vertically. The boundary loop surrounds it at a fixed margin and
//! is the only thing that ends a shot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (min corner inclusive, max corner inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from origin + size (CoreGraphics-style x, y, width, height)
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half extents (for AABB collision)
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Grow (or shrink, for negative `margin`) on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Map a normalized point ([0,1]² ) into this rect
    pub fn denormalize(&self, uv: Vec2) -> Vec2 {
        self.min + uv * self.size()
    }
}

/// The region obstacles and aiming live in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayableRect(Rect);

impl PlayableRect {
    /// Compute from the screen size and the widest allowed aspect ratio.
    ///
    /// Returns `None` when the screen has no area.
    pub fn from_screen(screen: Vec2, max_aspect_ratio: f32) -> Option<Self> {
        if !(screen.x > 0.0 && screen.y > 0.0 && max_aspect_ratio > 0.0) {
            return None;
        }
        let max_aspect_height = screen.x / max_aspect_ratio;
        let margin = (screen.y - max_aspect_height) / 2.0;
        let rect = Rect::from_origin_size(
            Vec2::new(0.0, margin),
            Vec2::new(screen.x, screen.y - margin * 2.0),
        );
        (rect.width() > 0.0 && rect.height() > 0.0).then_some(Self(rect))
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.0
    }
}

/// Edge loop surrounding the playable rect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryShape(Rect);

impl BoundaryShape {
    pub fn around(playable: &PlayableRect, margin: f32) -> Self {
        Self(playable.rect().inflate(margin))
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.0
    }
}
