//! Obstacle registry
//!
//! Owns the live obstacles of a level and the remaining-white count. The count
//! is taken once at load and only ever goes down, one per removed white block.

use super::state::Obstacle;
use super::world::BodyId;

#[derive(Debug, Clone, Default)]
pub struct ObstacleRegistry {
    /// Sorted by id
    obstacles: Vec<Obstacle>,
    remaining: u32,
}

impl ObstacleRegistry {
    /// Register a level's obstacles and count the ones that must be cleared
    pub fn load(mut obstacles: Vec<Obstacle>) -> Self {
        obstacles.sort_by_key(|o| o.id);
        let remaining = obstacles
            .iter()
            .filter(|o| o.kind.counts_for_clear())
            .count() as u32;
        Self {
            obstacles,
            remaining,
        }
    }

    /// White blocks still standing
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// True once every white block is gone
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.remaining == 0
    }

    /// Live obstacles of any kind
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.obstacles.binary_search_by_key(&id, |o| o.id).ok()
    }

    pub fn get(&self, id: BodyId) -> Option<&Obstacle> {
        self.index_of(id).map(|i| &self.obstacles[i])
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Obstacle> {
        self.index_of(id).map(move |i| &mut self.obstacles[i])
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove an obstacle. Removing a white block decrements the remaining count.
    ///
    /// Returns `None` if the obstacle was already removed.
    pub fn remove(&mut self, id: BodyId) -> Option<Obstacle> {
        let idx = self.index_of(id)?;
        let obstacle = self.obstacles.remove(idx);
        if obstacle.kind.counts_for_clear() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        Some(obstacle)
    }
}
