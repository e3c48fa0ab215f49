//! Progress persistence
//!
//! The only thing saved is the index of the level to resume at, written once
//! per win before the next level is requested. Stores are injected into the
//! session so tests can observe writes.
//!
//! File layout: a small JSON object `{ "lastLevel": N }`, written to a
//! temporary file and renamed over the save so a crash never leaves a torn file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Read/write one integer
pub trait ProgressStore {
    /// Last saved level index, if any
    fn last_level(&self) -> Option<usize>;
    /// Save a level index (synchronously)
    fn set_last_level(&mut self, index: usize);
}

/// In-memory store (tests, headless runs without `--save`)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    last_level: Option<usize>,
    /// Number of writes performed
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn last_level(&self) -> Option<usize> {
        self.last_level
    }

    fn set_last_level(&mut self, index: usize) {
        self.last_level = Some(index);
        self.writes += 1;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressFile {
    #[serde(rename = "lastLevel")]
    last_level: usize,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    last_level: Option<usize>,
}

impl JsonFileStore {
    /// Open (or prepare to create) the save at `path`.
    ///
    /// A missing file means no progress yet; an unreadable one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_level = match Self::read(&path) {
            Ok(level) => level,
            Err(e) => {
                log::warn!("Ignoring unreadable save: {:#}", e);
                None
            }
        };
        if let Some(level) = last_level {
            log::info!("Found saved progress at level {}", level);
        }
        Self { path, last_level }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> anyhow::Result<Option<usize>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let file: ProgressFile = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(file.last_level))
    }

    fn write(&self, index: usize) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string(&ProgressFile { last_level: index })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn last_level(&self) -> Option<usize> {
        self.last_level
    }

    fn set_last_level(&mut self, index: usize) {
        self.last_level = Some(index);
        match self.write(index) {
            Ok(()) => log::info!("Progress saved (level {})", index),
            Err(e) => log::warn!("Failed to save progress: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.last_level(), None);
        store.set_last_level(3);
        assert_eq!(store.last_level(), Some(3));
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves").join("progress.json");

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.last_level(), None);
        store.set_last_level(5);

        let json = std::fs::read_to_string(&path).unwrap();
        assert_eq!(json, r#"{"lastLevel":5}"#);
        assert_eq!(JsonFileStore::open(&path).last_level(), Some(5));
    }

    #[test]
    fn test_file_store_ignores_corrupt_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(JsonFileStore::open(&path).last_level(), None);
    }
}
