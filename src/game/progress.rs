//! Player progress across levels and sessions.
//!
//! [`PlayerProgress`] records the best star rating earned on each level, the
//! running star total, and the highest level the player may open. It is the
//! only state shared between attempts, and it only ever moves forward:
//!
//! - best stars per level are merged with a take-max, so recording a worse
//!   result never lowers a level's rating
//! - the unlock frontier only grows, up to [`MAX_LEVEL`]
//! - `total_stars` is recomputed from the per-level map after every merge
//!
//! # Examples
//!
//! ```rust
//! use untangle::game::progress::PlayerProgress;
//!
//! let mut progress = PlayerProgress::new();
//! progress.record_completion(5, 2);
//! progress.record_completion(5, 1);
//!
//! assert_eq!(progress.best_stars(5), 2);
//! assert_eq!(progress.total_stars(), 2);
//! ```

use crate::config::MAX_LEVEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest star rating a level can earn.
pub const MAX_STARS: u8 = 3;

/// Best results per level plus the unlock frontier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawProgress")]
pub struct PlayerProgress {
    highest_unlocked_level: u32,
    best_stars_per_level: BTreeMap<u32, u8>,
    total_stars: u32,
}

/// Wire form. Loading always goes through [`PlayerProgress::from`] so a
/// hand-edited or stale document cannot break the invariants.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProgress {
    #[serde(default = "first_level")]
    highest_unlocked_level: u32,
    #[serde(default)]
    best_stars_per_level: BTreeMap<u32, u8>,
}

fn first_level() -> u32 {
    1
}

impl From<RawProgress> for PlayerProgress {
    fn from(raw: RawProgress) -> Self {
        let best_stars_per_level: BTreeMap<u32, u8> = raw
            .best_stars_per_level
            .into_iter()
            .filter(|(level, _)| (1..=MAX_LEVEL).contains(level))
            .map(|(level, stars)| (level, stars.min(MAX_STARS)))
            .collect();
        let mut progress = Self {
            highest_unlocked_level: raw.highest_unlocked_level.clamp(1, MAX_LEVEL),
            best_stars_per_level,
            total_stars: 0,
        };
        progress.recount();
        progress
    }
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgress {
    /// Fresh progress: level 1 unlocked, no stars.
    pub fn new() -> Self {
        Self {
            highest_unlocked_level: 1,
            best_stars_per_level: BTreeMap::new(),
            total_stars: 0,
        }
    }

    /// Merges a completed attempt into the record.
    ///
    /// Keeps the better of the stored and new rating for `level` and unlocks
    /// the following level (capped at [`MAX_LEVEL`]). Merging the same result
    /// twice changes nothing the second time. Returns whether anything
    /// changed.
    pub fn record_completion(&mut self, level: u32, stars: u8) -> bool {
        if !(1..=MAX_LEVEL).contains(&level) {
            log::warn!("ignoring completion for out-of-range level {}", level);
            return false;
        }
        let stars = stars.min(MAX_STARS);
        let mut changed = match self.best_stars_per_level.get(&level) {
            Some(&best) if best >= stars => false,
            _ => {
                self.best_stars_per_level.insert(level, stars);
                true
            }
        };

        let unlocked = (level + 1).min(MAX_LEVEL);
        if unlocked > self.highest_unlocked_level {
            self.highest_unlocked_level = unlocked;
            changed = true;
        }

        self.recount();
        if changed {
            log::info!(
                "progress: level {} best {} stars, {} total, unlocked up to {}",
                level,
                self.best_stars(level),
                self.total_stars,
                self.highest_unlocked_level
            );
        }
        changed
    }

    pub fn best_stars(&self, level: u32) -> u8 {
        self.best_stars_per_level.get(&level).copied().unwrap_or(0)
    }

    pub fn best_stars_per_level(&self) -> &BTreeMap<u32, u8> {
        &self.best_stars_per_level
    }

    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    pub fn highest_unlocked_level(&self) -> u32 {
        self.highest_unlocked_level
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        (1..=self.highest_unlocked_level).contains(&level)
    }

    /// Whether `level` has been completed at least once.
    pub fn is_completed(&self, level: u32) -> bool {
        self.best_stars_per_level.contains_key(&level)
    }

    fn recount(&mut self) {
        self.total_stars = self
            .best_stars_per_level
            .values()
            .map(|&s| u32::from(s))
            .sum();
    }
}
