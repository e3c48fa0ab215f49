//! Ricochet headless runner
//!
//! Plays levels without a renderer: every attempt launches one ball from the
//! bottom center of the playable area toward a white block, then follows the
//! game manager's request to the next (or same) level.
//!
//! Example:
//!   RUST_LOG=info cargo run -- --seed 7 --attempts 20 --save progress.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use ricochet::sim::ObstacleKind;
use ricochet::{
    DirectoryLevels, Director, GeneratedLevels, JsonFileStore, LevelProvider, LevelRequest,
    LevelSession, MemoryStore, ProgressStore, Settings,
};

/// Frame time the runner feeds the session
const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames before a shot is given up on
const MAX_FRAMES: usize = 60 * 60;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play ricochet levels headlessly", long_about = None)]
struct Args {
    /// Directory holding level0.json, level1.json, ... (generated levels if omitted)
    #[arg(long)]
    levels_dir: Option<PathBuf>,
    /// Seed for generated levels
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Save file for progress (in-memory if omitted)
    #[arg(long)]
    save: Option<PathBuf>,
    /// Number of shots to play
    #[arg(long, default_value_t = 10)]
    attempts: usize,
    /// Settings JSON overriding the built-in tuning
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 1024.0)]
    screen_width: f32,
    #[arg(long, default_value_t = 768.0)]
    screen_height: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Ricochet (headless) starting...");

    let mut settings = Settings::load_or_default(args.settings.as_deref());
    let provider: Box<dyn LevelProvider> = match &args.levels_dir {
        Some(dir) => Box::new(DirectoryLevels::open(dir)?),
        None => Box::new(GeneratedLevels::new(args.seed, settings.level_count)),
    };
    settings.level_count = provider.level_count();

    match &args.save {
        Some(path) => play(&args, provider.as_ref(), &settings, JsonFileStore::open(path)),
        None => play(&args, provider.as_ref(), &settings, MemoryStore::new()),
    }
}

fn play<S: ProgressStore>(
    args: &Args,
    provider: &dyn LevelProvider,
    settings: &Settings,
    mut store: S,
) -> Result<()> {
    let screen = Vec2::new(args.screen_width, args.screen_height);
    let mut level = store.last_level().unwrap_or(0) % settings.level_count;
    let mut director = Director::new();
    let mut wins = 0;

    for attempt in 0..args.attempts {
        let asset = provider
            .load(level)
            .with_context(|| format!("loading level {}", level))?;
        let mut session = LevelSession::new(level, &asset, screen, settings, store, director)?;

        let origin = session.playable().rect().denormalize(Vec2::new(0.5, 0.1));
        let target = pick_target(&session, origin, attempt);
        session.pointer_began(origin);
        session.pointer_moved(target);
        session.pointer_ended();

        let mut frames = 0;
        while !session.is_ended() && frames < MAX_FRAMES {
            session.tick(FRAME_DT);
            frames += 1;
        }
        for event in session.drain_events() {
            log::trace!("{:?}", event);
        }

        if session.is_ended() {
            log::info!(
                "Attempt {}: level {} {:?} after {:.2}s",
                attempt + 1,
                level,
                session.phase(),
                frames as f32 * FRAME_DT
            );
        } else {
            log::warn!("Attempt {}: level {} timed out", attempt + 1, level);
        }

        (store, director) = session.into_parts();
        level = match director.take_request() {
            Some(request @ LevelRequest::Load { .. }) => {
                wins += 1;
                request.index()
            }
            Some(request) => request.index(),
            None => level,
        };
    }

    log::info!(
        "Played {} attempts, {} wins, next level {}",
        args.attempts,
        wins,
        level
    );
    Ok(())
}

/// Aim at a white block, cycling through them by distance on repeated attempts
fn pick_target<S: ProgressStore>(
    session: &LevelSession<S, Director>,
    origin: Vec2,
    attempt: usize,
) -> Vec2 {
    let mut whites: Vec<Vec2> = session
        .registry()
        .iter()
        .filter(|o| o.kind == ObstacleKind::White)
        .map(|o| o.rect.center())
        .collect();
    if whites.is_empty() {
        return origin + Vec2::Y;
    }
    whites.sort_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)));
    whites[attempt % whites.len()]
}
