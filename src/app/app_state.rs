//! AppState module.
//!
//! This module defines the [`AppState`] struct, which holds the running level
//! session together with the state that outlives it: player progress and
//! settings. The configuration lives on the session, see
//! [`LevelSession::config`].

use crate::config::GameConfig;
use crate::game::progress::PlayerProgress;
use crate::game::session::{LevelSession, SessionEvent, SessionSnapshot};
use crate::persist::{SaveRecord, Settings};
use serde::Serialize;
use std::time::Instant;

/// Everything the app needs between frames.
#[derive(Debug)]
pub struct AppState {
    /// The level being played.
    pub session: LevelSession,
    /// Best results and unlocks. Only changes on completion.
    pub progress: PlayerProgress,
    pub settings: Settings,
}

/// Read-only view of the whole app for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub session: SessionSnapshot,
    pub progress: PlayerProgress,
    pub settings: Settings,
}

impl AppState {
    /// Restores state from a save record and lays out its current level.
    ///
    /// A saved level beyond the unlock frontier is pulled back to it.
    pub fn new(config: GameConfig, record: SaveRecord, now: Instant) -> Self {
        let progress = record.player_stats;
        let level = record
            .current_level
            .clamp(1, progress.highest_unlocked_level());
        if level != record.current_level {
            log::warn!(
                "saved level {} is locked, resuming at {}",
                record.current_level,
                level
            );
        }
        let session = LevelSession::new(config, level, now);
        Self {
            session,
            progress,
            settings: record.settings,
        }
    }

    /// Applies the side effects of a session transition.
    ///
    /// # Returns
    /// `true` when the persisted record changed and should be saved.
    pub fn apply_session_event(&mut self, event: &SessionEvent) -> bool {
        match *event {
            SessionEvent::Completed { level, stars, .. } => {
                self.progress.record_completion(level, stars);
                true
            }
            // The current level is part of the record.
            SessionEvent::LevelLoaded { .. } => true,
            SessionEvent::Started { .. } | SessionEvent::Failed { .. } => false,
        }
    }

    /// The record that would be written right now, without a timestamp.
    pub fn to_record(&self) -> SaveRecord {
        SaveRecord {
            current_level: self.session.level(),
            player_stats: self.progress.clone(),
            settings: self.settings,
            saved_at: None,
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            session: self.session.snapshot(),
            progress: self.progress.clone(),
            settings: self.settings,
        }
    }
}
