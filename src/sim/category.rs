//! Collision categories
//!
//! Every body carries exactly one category bit. A contact pair is identified by
//! OR-ing the two participants' bits, so `BALL | BLOCK` names a ball/obstacle hit
//! regardless of which body the physics step reported first.

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Bitmask over {None, Ball, Block, Bounds}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionCategory(u32);

impl CollisionCategory {
    pub const NONE: Self = Self(0);
    pub const BALL: Self = Self(0b1);
    pub const BLOCK: Self = Self(0b10);
    pub const BOUNDS: Self = Self(0b100);

    /// Raw bits
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit in `other` is also set here
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit is shared
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if exactly one category bit is set
    #[inline]
    pub const fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }
}

impl BitOr for CollisionCategory {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Category pairs the resolver cares about
pub const BALL_BLOCK: CollisionCategory = CollisionCategory(0b11);
pub const BALL_BOUNDS: CollisionCategory = CollisionCategory(0b101);
