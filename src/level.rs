//! Level assets and providers
//!
//! A level is an ordered list of obstacle placements in normalized playable
//! coordinates ((0,0) = playable min corner, (1,1) = max corner). Assets come
//! from JSON files on disk or from a seeded generator.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_HEIGHT, OBSTACLE_WIDTH};
use crate::sim::ObstacleKind;

fn default_size() -> Vec2 {
    Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT)
}

/// One obstacle placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDescriptor {
    pub kind: ObstacleKind,
    /// Center, normalized to the playable rect
    pub pos: Vec2,
    /// Full width/height in scene units
    #[serde(default = "default_size")]
    pub size: Vec2,
}

impl ObstacleDescriptor {
    pub fn new(kind: ObstacleKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            size: default_size(),
        }
    }
}

/// A loaded level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelAsset {
    #[serde(default)]
    pub name: Option<String>,
    /// Show the drag hint until the first touch
    #[serde(default)]
    pub onboarding: bool,
    pub obstacles: Vec<ObstacleDescriptor>,
}

impl LevelAsset {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid level JSON")
    }

    /// Number of white obstacles (the level's win target)
    pub fn white_count(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|o| o.kind.counts_for_clear())
            .count()
    }
}

/// Source of level assets
pub trait LevelProvider {
    fn level_count(&self) -> usize;
    fn load(&self, index: usize) -> anyhow::Result<LevelAsset>;
}

/// Levels stored as `level{N}.json` in a directory
#[derive(Debug, Clone)]
pub struct DirectoryLevels {
    dir: PathBuf,
    count: usize,
}

impl DirectoryLevels {
    /// Scan `dir` for consecutive `level0.json`, `level1.json`, ...
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        anyhow::ensure!(dir.is_dir(), "level directory {} not found", dir.display());

        let count = (0..)
            .take_while(|i| Self::file_for(&dir, *i).is_file())
            .count();
        anyhow::ensure!(count > 0, "no level0.json in {}", dir.display());

        log::info!("Found {} levels in {}", count, dir.display());
        Ok(Self { dir, count })
    }

    fn file_for(dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("level{}.json", index))
    }
}

impl LevelProvider for DirectoryLevels {
    fn level_count(&self) -> usize {
        self.count
    }

    fn load(&self, index: usize) -> anyhow::Result<LevelAsset> {
        anyhow::ensure!(index < self.count, "level {} out of range (0..{})", index, self.count);
        let path = Self::file_for(&self.dir, index);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        LevelAsset::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Procedurally generated levels (deterministic per seed and index)
#[derive(Debug, Clone)]
pub struct GeneratedLevels {
    seed: u64,
    count: usize,
}

impl GeneratedLevels {
    pub fn new(seed: u64, count: usize) -> Self {
        Self {
            seed,
            count: count.max(1),
        }
    }
}

impl LevelProvider for GeneratedLevels {
    fn level_count(&self) -> usize {
        self.count
    }

    fn load(&self, index: usize) -> anyhow::Result<LevelAsset> {
        anyhow::ensure!(index < self.count, "level {} out of range (0..{})", index, self.count);
        Ok(generate_level(index, self.seed))
    }
}

/// Grid the generator places obstacles on (upper part of the playable rect)
const GRID_COLS: usize = 6;
const GRID_ROWS: usize = 4;

/// Generate a level layout
///
/// Level 0 is the tutorial: three white blocks in a column straight up from
/// the bottom center, with the onboarding hint. Later levels add more white
/// blocks, then black blocks (level 2+) and red blocks (level 4+).
pub fn generate_level(index: usize, seed: u64) -> LevelAsset {
    if index == 0 {
        return LevelAsset {
            name: Some("Tutorial".to_string()),
            onboarding: true,
            obstacles: (0..3)
                .map(|i| {
                    ObstacleDescriptor::new(ObstacleKind::White, Vec2::new(0.5, 0.45 + 0.15 * i as f32))
                })
                .collect(),
        };
    }

    // Deterministic "randomness" based on level number AND run seed
    let level_seed = (index as u64)
        .wrapping_mul(2654435761)
        .wrapping_add(seed);
    let mut rng = Pcg32::seed_from_u64(level_seed);

    let mut cells: Vec<(usize, usize)> = (0..GRID_ROWS)
        .flat_map(|row| (0..GRID_COLS).map(move |col| (col, row)))
        .collect();
    cells.shuffle(&mut rng);

    let whites = (2 + index).min(8);
    let blacks = if index >= 2 { rng.random_range(1..=index.min(4)) } else { 0 };
    let reds = if index >= 4 { rng.random_range(1..=2) } else { 0 };

    let kinds = std::iter::repeat_n(ObstacleKind::White, whites)
        .chain(std::iter::repeat_n(ObstacleKind::Black, blacks))
        .chain(std::iter::repeat_n(ObstacleKind::Red, reds));

    let obstacles = kinds
        .zip(cells)
        .map(|(kind, (col, row))| {
            let x = 0.1 + 0.8 * (col as f32 + 0.5) / GRID_COLS as f32;
            let y = 0.45 + 0.45 * (row as f32 + 0.5) / GRID_ROWS as f32;
            ObstacleDescriptor::new(kind, Vec2::new(x, y))
        })
        .collect();

    log::debug!(
        "Generated level {}: {} white, {} black, {} red",
        index,
        whites,
        blacks,
        reds
    );

    LevelAsset {
        name: Some(format!("Level {}", index + 1)),
        onboarding: false,
        obstacles,
    }
}
