//! Game settings and tuning
//!
//! Every gameplay constant a designer might want to tweak, with defaults taken
//! from `consts`. Loaded from a JSON file; missing fields keep their defaults.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Progression ===
    /// Levels before progression wraps back to 0
    pub level_count: usize,

    // === Play area ===
    /// Widest playable aspect ratio (width / height)
    pub max_aspect_ratio: f32,
    /// Distance from the playable rect to the boundary loop
    pub boundary_margin: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    /// Impulse magnitude applied at launch
    pub launch_force: f32,
    /// Bounce factor off solid blocks and walls (1.0 = perfectly elastic)
    pub restitution: f32,

    // === Cues / presentation ===
    /// Seconds between the last white block breaking and the level-clear cue
    pub level_clear_cue_delay: f32,
    /// Scene alpha while paused
    pub pause_dim_alpha: f32,
    /// Fade-in duration after resume (cosmetic only)
    pub resume_fade_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level_count: LEVEL_COUNT,

            max_aspect_ratio: MAX_ASPECT_RATIO,
            boundary_margin: BOUNDARY_MARGIN,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            launch_force: LAUNCH_FORCE,
            restitution: 1.0,

            level_clear_cue_delay: LEVEL_CLEAR_CUE_DELAY,
            pause_dim_alpha: PAUSE_DIM_ALPHA,
            resume_fade_secs: RESUME_FADE_SECS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(json).context("invalid settings JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.level_count > 0, "level_count must be at least 1");
        anyhow::ensure!(self.max_aspect_ratio > 0.0, "max_aspect_ratio must be positive");
        anyhow::ensure!(self.ball_radius > 0.0, "ball_radius must be positive");
        anyhow::ensure!(self.ball_mass > 0.0, "ball_mass must be positive");
        anyhow::ensure!(self.boundary_margin >= 0.0, "boundary_margin must not be negative");
        Ok(())
    }
}
