//! Game configuration.
//!
//! [`GameConfig`] carries every tunable the core depends on: the play area,
//! the generator's inner padding, per-level time and rope-count tables, and
//! the timing of the session state machine. Everything has a default, and a
//! config can be loaded from a partial JSON document where missing keys keep
//! their defaults.

use crate::math::Bounds;
use crate::tangle::generator::DEFAULT_PADDING;
use crate::tangle::{TUTORIAL_LAYOUTS, TUTORIAL_LEVEL_COUNT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Highest level index in the game.
pub const MAX_LEVEL: u32 = 30;

/// Fewest ropes a generated level gets. One rope can never cross anything.
pub const MIN_ROPE_COUNT: usize = 2;

/// Tunables for the puzzle core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Rectangle every rope endpoint is kept inside.
    pub bounds: Bounds,
    /// Inset applied before placing generated endpoints.
    pub padding: f64,
    /// Delay between a level being loaded and its timer starting.
    pub auto_start_delay_ms: u64,
    /// Countdown tick period. One tick removes one second.
    pub tick_period_ms: u64,
    /// Seconds allowed for each level, indexed by `level - 1`.
    pub level_times: Vec<u32>,
    /// Rope count for each level, indexed by `level - 1`. Tutorial levels
    /// ignore this and use their fixture.
    pub rope_counts: Vec<usize>,
    /// Fixed base seed for layout generation. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::DEFAULT_PLAY_AREA,
            padding: DEFAULT_PADDING,
            auto_start_delay_ms: 500,
            tick_period_ms: 1000,
            level_times: (1..=MAX_LEVEL).map(default_level_time).collect(),
            rope_counts: (1..=MAX_LEVEL).map(default_rope_count).collect(),
            seed: None,
        }
    }
}

/// 30 seconds for level 1, three more per level, capped at 90.
pub fn default_level_time(level: u32) -> u32 {
    (30 + 3 * level.saturating_sub(1)).min(90)
}

/// Fixture size for tutorial levels, then one more rope every three levels.
pub fn default_rope_count(level: u32) -> usize {
    if level <= TUTORIAL_LEVEL_COUNT {
        return TUTORIAL_LAYOUTS
            .iter()
            .find(|l| l.level == level)
            .map_or(2, |l| l.ropes.len());
    }
    ((level as usize + 5) / 3).clamp(4, 12)
}

impl GameConfig {
    /// Parses a (possibly partial) JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamps `level` into `1..=MAX_LEVEL`.
    pub fn clamp_level(level: u32) -> u32 {
        level.clamp(1, MAX_LEVEL)
    }

    /// Seconds allowed for `level`. Never zero.
    ///
    /// Levels past the end of the table reuse its last entry.
    pub fn time_for_level(&self, level: u32) -> u32 {
        let level = Self::clamp_level(level);
        let table_value = self
            .level_times
            .get(level as usize - 1)
            .or_else(|| self.level_times.last())
            .copied()
            .unwrap_or_else(|| default_level_time(level));
        table_value.max(1)
    }

    /// Rope count used when generating `level`, never below
    /// [`MIN_ROPE_COUNT`].
    pub fn rope_count_for_level(&self, level: u32) -> usize {
        let level = Self::clamp_level(level);
        self.rope_counts
            .get(level as usize - 1)
            .or_else(|| self.rope_counts.last())
            .copied()
            .unwrap_or_else(|| default_rope_count(level))
            .max(MIN_ROPE_COUNT)
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_millis(self.auto_start_delay_ms)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }
}
