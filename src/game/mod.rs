//! Gameplay state for a single player.
//!
//! This module holds everything that changes while a level is being played:
//!
//! - [`puzzle`]: the ropes of the current attempt and their crossing state
//! - [`session`]: the level lifecycle, countdown and star rating
//! - [`timer`]: the cancellable countdown ticker owned by a session
//! - [`progress`]: best results and unlocks across levels
//! - [`input`]: the events the presentation layer sends in
//!
//! The most commonly used types are re-exported here.

pub mod input;
pub mod progress;
pub mod puzzle;
pub mod session;
pub mod timer;

pub use input::{DragEvent, DragPhase, GameEvent, LevelCommand};
pub use progress::PlayerProgress;
pub use puzzle::{PuzzleSnapshot, PuzzleState};
pub use session::{LevelSession, Lifecycle, SessionEvent, SessionSnapshot, stars};
pub use timer::{TickerId, TimerSlot};
