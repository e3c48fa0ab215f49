//! Aim controller
//!
//! Turns the single drag gesture into a launch request. The controller only
//! decides *whether* and *where*; launching is the session's job.

use glam::Vec2;

use crate::consts::OFFSCREEN;
use crate::sim::LevelMachine;

/// Gesture phase reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
}

/// Aim line and its two end markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimVisual {
    /// Segment from the shooting position to the drag position, if shown
    pub line: Option<(Vec2, Vec2)>,
    pub start_marker: Vec2,
    pub end_marker: Vec2,
}

impl Default for AimVisual {
    fn default() -> Self {
        Self::hidden()
    }
}

impl AimVisual {
    /// Markers parked off-screen, no line
    pub fn hidden() -> Self {
        Self {
            line: None,
            start_marker: OFFSCREEN,
            end_marker: OFFSCREEN,
        }
    }

    pub fn between(start: Vec2, end: Vec2) -> Self {
        Self {
            line: Some((start, end)),
            start_marker: start,
            end_marker: end,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.line.is_some()
    }
}

/// Where to launch from and toward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    pub origin: Vec2,
    pub target: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct AimController {
    shooting_pos: Vec2,
    drag_pos: Option<Vec2>,
    visual: AimVisual,
}

impl AimController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shooting_pos(&self) -> Vec2 {
        self.shooting_pos
    }

    pub fn drag_pos(&self) -> Option<Vec2> {
        self.drag_pos
    }

    pub fn visual(&self) -> &AimVisual {
        &self.visual
    }

    /// Finger down: remember where the shot starts
    pub fn begin(&mut self, pos: Vec2, machine: &mut LevelMachine) {
        self.shooting_pos = pos;
        self.drag_pos = None;
        machine.begin_aim();
    }

    /// Finger moved. Returns the new visual if the aim was redrawn.
    pub fn change(&mut self, pos: Vec2, machine: &mut LevelMachine) -> Option<AimVisual> {
        if machine.shooting_in_progress() {
            // No redefining the aim mid-shot
            machine.reject_aim();
            return None;
        }
        self.drag_pos = Some(pos);
        if !machine.can_aim() {
            return None;
        }
        self.visual = AimVisual::between(self.shooting_pos, pos);
        Some(self.visual)
    }

    /// Finger up. Returns a launch request if the aim is still valid.
    ///
    /// A gesture with no movement aims at its own start point.
    pub fn end(&mut self, machine: &LevelMachine) -> Option<LaunchRequest> {
        if !machine.can_aim() {
            return None;
        }
        self.visual = AimVisual::hidden();
        Some(LaunchRequest {
            origin: self.shooting_pos,
            target: self.drag_pos.unwrap_or(self.shooting_pos),
        })
    }
}
