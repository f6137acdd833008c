//! Save record and the stores that hold it.
//!
//! The whole persisted state is one flat JSON document:
//!
//! ```json
//! {
//!   "currentLevel": 4,
//!   "playerStats": { "highestUnlockedLevel": 4, "bestStarsPerLevel": { "1": 3 }, "totalStars": 3 },
//!   "settings": { "soundEnabled": true, "hapticsEnabled": true, "showCrossingMarkers": false },
//!   "savedAt": "2026-01-01T12:00:00Z"
//! }
//! ```
//!
//! Stores implement [`SaveStore`]. Loading never fails from the game's point
//! of view: [`load_or_default`] turns every error into a warning and a fresh
//! record.

use crate::config::MAX_LEVEL;
use crate::error::PersistError;
use crate::game::progress::PlayerProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Player-facing toggles. The core stores them but does not act on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Highlight crossing ropes while playing.
    pub show_crossing_markers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            show_crossing_markers: false,
        }
    }
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub current_level: u32,
    #[serde(default)]
    pub player_stats: PlayerProgress,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self {
            current_level: 1,
            player_stats: PlayerProgress::new(),
            settings: Settings::default(),
            saved_at: None,
        }
    }
}

impl SaveRecord {
    /// Checks the parts serde cannot.
    pub fn validate(&self) -> Result<(), PersistError> {
        if !(1..=MAX_LEVEL).contains(&self.current_level) {
            return Err(PersistError::InvalidRecord(format!(
                "current level {} is outside 1..={}",
                self.current_level, MAX_LEVEL
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistError> {
        let record: SaveRecord = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a copy stamped with `now`.
    pub fn stamped(&self, now: DateTime<Utc>) -> Self {
        Self {
            saved_at: Some(now),
            ..self.clone()
        }
    }
}

/// Somewhere a [`SaveRecord`] can be kept.
pub trait SaveStore {
    /// Reads the stored record. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveRecord>, PersistError>;

    fn save(&mut self, record: &SaveRecord) -> Result<(), PersistError>;
}

/// Loads the stored record, falling back to defaults on any failure.
pub fn load_or_default(store: &dyn SaveStore) -> SaveRecord {
    match store.load() {
        Ok(Some(record)) => record,
        Ok(None) => {
            log::info!("no save record found, starting fresh");
            SaveRecord::default()
        }
        Err(e) => {
            log::warn!("failed to load save record, starting fresh: {}", e);
            SaveRecord::default()
        }
    }
}

/// Keeps the record as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> Result<Option<SaveRecord>, PersistError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        SaveRecord::from_json_str(&json).map(Some)
    }

    /// Writes next to the target and renames over it, so a crash mid-write
    /// leaves the previous record intact.
    fn save(&mut self, record: &SaveRecord) -> Result<(), PersistError> {
        let json = record.to_json_string()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("saved record to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<SaveRecord>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: SaveRecord) -> Self {
        Self {
            record: Some(record),
            saves: 0,
        }
    }

    pub fn record(&self) -> Option<&SaveRecord> {
        self.record.as_ref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> Result<Option<SaveRecord>, PersistError> {
        match &self.record {
            Some(record) => {
                record.validate()?;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, record: &SaveRecord) -> Result<(), PersistError> {
        self.record = Some(record.clone());
        self.saves += 1;
        Ok(())
    }
}
