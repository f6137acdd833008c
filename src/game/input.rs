//! Input events consumed from the presentation layer.
//!
//! This module defines [`GameEvent`], the single vocabulary the host uses to
//! talk to the core, and [`DragState`] for tracking which rope ends are
//! currently held. Gesture capture itself happens outside the crate; by the
//! time an event arrives here it is already expressed in play-area
//! coordinates.

use crate::math::Point;
use crate::tangle::{RopeEnd, RopeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stage of a drag gesture on one rope end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragPhase {
    Start,
    Move,
    End,
}

/// One step of a drag on a rope endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub rope: RopeId,
    pub end: RopeEnd,
    pub point: Point,
    pub phase: DragPhase,
}

/// Lifecycle requests from menus and result screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelCommand {
    /// New layout for the current level. Allowed in any state.
    Reset,
    /// New attempt at the current level after it completed or failed.
    Retry,
    /// Move on to the next level, if it is unlocked.
    AdvanceLevel,
    /// Jump to a specific unlocked level.
    SelectLevel(u32),
}

/// Everything the host can send to the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Drag(DragEvent),
    /// A one-shot endpoint move outside of any drag gesture.
    MoveEndpoint {
        rope: RopeId,
        end: RopeEnd,
        point: Point,
    },
    Command(LevelCommand),
    /// The app lost focus. Timers pause.
    Background,
    /// The app regained focus. Timers resume without catching up.
    Foreground,
}

/// Tracks the set of rope ends currently being dragged.
///
/// Multi-touch hosts may hold more than one end at a time; a drag is active
/// until every held end has been released.
#[derive(Debug, Default)]
pub struct DragState {
    held: HashSet<(RopeId, RopeEnd)>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one drag step and returns whether any end is still held
    /// afterwards.
    pub fn apply(&mut self, event: &DragEvent) -> bool {
        let key = (event.rope, event.end);
        match event.phase {
            DragPhase::Start | DragPhase::Move => {
                self.held.insert(key);
            }
            DragPhase::End => {
                self.held.remove(&key);
            }
        }
        self.is_active()
    }

    /// Whether at least one rope end is held.
    pub fn is_active(&self) -> bool {
        !self.held.is_empty()
    }

    pub fn is_held(&self, rope: RopeId, end: RopeEnd) -> bool {
        self.held.contains(&(rope, end))
    }

    /// Releases everything, e.g. when the puzzle is replaced under the
    /// player's finger.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(rope: u32, end: RopeEnd, phase: DragPhase) -> DragEvent {
        DragEvent {
            rope: RopeId(rope),
            end,
            point: Point::new(1.0, 1.0),
            phase,
        }
    }

    #[test]
    fn test_drag_is_active_until_released() {
        let mut drags = DragState::new();
        assert!(!drags.is_active());
        assert!(drags.apply(&drag(0, RopeEnd::Start, DragPhase::Start)));
        assert!(drags.apply(&drag(0, RopeEnd::Start, DragPhase::Move)));
        assert!(drags.is_held(RopeId(0), RopeEnd::Start));
        assert!(!drags.apply(&drag(0, RopeEnd::Start, DragPhase::End)));
    }

    #[test]
    fn test_two_fingers_release_independently() {
        let mut drags = DragState::new();
        drags.apply(&drag(0, RopeEnd::Start, DragPhase::Start));
        drags.apply(&drag(1, RopeEnd::End, DragPhase::Start));
        assert!(drags.apply(&drag(0, RopeEnd::Start, DragPhase::End)));
        assert!(!drags.apply(&drag(1, RopeEnd::End, DragPhase::End)));
    }

    #[test]
    fn test_stray_end_is_harmless() {
        let mut drags = DragState::new();
        assert!(!drags.apply(&drag(3, RopeEnd::End, DragPhase::End)));
        drags.apply(&drag(3, RopeEnd::End, DragPhase::Start));
        drags.clear();
        assert!(!drags.is_active());
    }

    #[test]
    fn test_events_deserialize_from_json() {
        let json = r#"{ "Command": { "SelectLevel": 4 } }"#;
        let event: GameEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, GameEvent::Command(LevelCommand::SelectLevel(4)));
    }
}
