//! Game manager port
//!
//! The session tells the outside world what to load next through exactly one
//! call per level attempt. Scene transitions, level select and loading
//! screens are the manager's business.

/// Level transition entry points
pub trait GameManager {
    /// Restart the same level (after a loss)
    fn reload_level(&mut self, index: usize);
    /// Load a level; `is_next` is true when advancing after a win
    fn load_level(&mut self, index: usize, is_next: bool);
}

/// A requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRequest {
    Reload(usize),
    Load { index: usize, is_next: bool },
}

impl LevelRequest {
    /// Level index to load
    pub fn index(self) -> usize {
        match self {
            LevelRequest::Reload(index) | LevelRequest::Load { index, .. } => index,
        }
    }
}

/// Manager that records requests for the host loop to act on
#[derive(Debug, Clone, Default)]
pub struct Director {
    requests: Vec<LevelRequest>,
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> &[LevelRequest] {
        &self.requests
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<LevelRequest> {
        self.requests.last().copied()
    }

    /// Take the pending request, leaving the director empty
    pub fn take_request(&mut self) -> Option<LevelRequest> {
        let request = self.requests.pop();
        self.requests.clear();
        request
    }
}

impl GameManager for Director {
    fn reload_level(&mut self, index: usize) {
        log::info!("Reloading level {}", index);
        self.requests.push(LevelRequest::Reload(index));
    }

    fn load_level(&mut self, index: usize, is_next: bool) {
        log::info!("Loading level {} (next: {})", index, is_next);
        self.requests.push(LevelRequest::Load { index, is_next });
    }
}
