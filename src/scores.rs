//! High-score lists and the key-value stores that persist them.
//!
//! A list is a flat JSON array of integers, sorted descending and capped.
//! Reads fail open: a missing or corrupt blob is an empty list.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of entries kept per list.
pub const CAPACITY: usize = 10;

#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Descending, capped list of historical scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    scores: Vec<u64>,
    capacity: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(CAPACITY)
    }
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        Self { scores: Vec::with_capacity(capacity), capacity }
    }

    /// Build from arbitrary scores, sorting descending and truncating.
    pub fn from_scores(mut scores: Vec<u64>, capacity: usize) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(capacity);
        Self { scores, capacity }
    }

    /// Parse a JSON array blob. Anything unreadable yields an empty list.
    ///
    /// ```
    /// use arcade_grid::scores::HighScores;
    /// assert_eq!(HighScores::parse("[10, 30, 20]", 10).as_slice(), &[30, 20, 10]);
    /// assert!(HighScores::parse("not json", 10).is_empty());
    /// ```
    pub fn parse(blob: &str, capacity: usize) -> Self {
        match serde_json::from_str::<Vec<u64>>(blob) {
            Ok(scores) => Self::from_scores(scores, capacity),
            Err(e) => {
                warn!("discarding unreadable high-score blob: {e}");
                Self::new(capacity)
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.scores.clone()).to_string()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.scores
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Best score so far (0 when empty).
    #[inline]
    pub fn best(&self) -> u64 {
        self.scores.first().copied().unwrap_or(0)
    }

    /// A score enters the list while there is room, or when it beats the lowest entry.
    pub fn qualifies(&self, score: u64) -> bool {
        self.scores.len() < self.capacity || self.scores.last().is_some_and(|&low| score > low)
    }

    /// Insert `score` if it qualifies. Returns its zero-based rank.
    pub fn insert(&mut self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.scores.partition_point(|&s| s >= score);
        self.scores.insert(rank, score);
        self.scores.truncate(self.capacity);
        Some(rank)
    }
}

/// Key-value persistence for high-score lists.
pub trait ScoreStore {
    /// Raw blob stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, blob: String) -> Result<(), ScoreError>;

    /// Load the list stored under `key`, failing open to an empty list.
    fn load(&self, key: &str, capacity: usize) -> HighScores {
        match self.read(key) {
            Some(blob) => HighScores::parse(&blob, capacity),
            None => HighScores::new(capacity),
        }
    }

    fn save(&mut self, key: &str, scores: &HighScores) -> Result<(), ScoreError> {
        self.write(key, scores.to_json())
    }

    /// Load, insert and save in one step. Returns the rank when the score made the list.
    fn record(&mut self, key: &str, score: u64, capacity: usize) -> Result<Option<usize>, ScoreError> {
        let mut list = self.load(key, capacity);
        let rank = list.insert(score);
        if rank.is_some() {
            self.save(key, &list)?;
        }
        Ok(rank)
    }
}

/// In-memory store, useful for tests and for running without a score file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.blobs.get(key).cloned()
    }

    fn write(&mut self, key: &str, blob: String) -> Result<(), ScoreError> {
        self.blobs.insert(key.to_string(), blob);
        Ok(())
    }
}

/// A single JSON object on disk mapping each key to its score array,
/// e.g. `{"2048": [1200, 800], "snake.classic": [40]}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, Value> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("cannot read score file {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!("score file {} is corrupt, starting fresh: {e}", self.path.display());
            BTreeMap::new()
        })
    }
}

impl ScoreStore for JsonFileStore {
    // A malformed entry comes back as-is and fails open in `HighScores::parse`.
    fn read(&self, key: &str) -> Option<String> {
        self.read_all().remove(key).map(|v| v.to_string())
    }

    fn write(&mut self, key: &str, blob: String) -> Result<(), ScoreError> {
        let value: Value = serde_json::from_str(&blob)?;
        let mut all = self.read_all();
        all.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}
