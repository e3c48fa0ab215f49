//! Timed cues
//!
//! Fire-and-forget callbacks driven by the simulation clock. Pausing freezes
//! their countdowns in place; resuming continues from where they stopped.

use serde::{Deserialize, Serialize};

/// A presentation cue (sound / visual completion signal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Level entered
    LevelStart,
    /// Last white block cleared
    LevelClear,
}

#[derive(Debug, Clone)]
struct ScheduledCue {
    cue: Cue,
    remaining: f32,
}

/// Pending cues in scheduling order
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: Vec<ScheduledCue>,
    paused: bool,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `cue` after `delay` seconds of running sim time
    pub fn schedule(&mut self, cue: Cue, delay: f32) {
        self.pending.push(ScheduledCue {
            cue,
            remaining: delay.max(0.0),
        });
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Seconds left before `cue` fires (first scheduled instance)
    pub fn time_left(&self, cue: Cue) -> Option<f32> {
        self.pending
            .iter()
            .find(|s| s.cue == cue)
            .map(|s| s.remaining)
    }

    /// Count down by `dt` and return cues that came due, in scheduling order
    pub fn advance(&mut self, dt: f32) -> Vec<Cue> {
        if self.paused || self.pending.is_empty() {
            return Vec::new();
        }
        let mut fired = Vec::new();
        self.pending.retain_mut(|s| {
            s.remaining -= dt;
            if s.remaining <= 0.0 {
                fired.push(s.cue);
                false
            } else {
                true
            }
        });
        fired
    }
}
