//! Application facade.
//!
//! This module ties the gameplay pieces together into something a host can
//! drive with a handful of calls: feed it [`GameEvent`](crate::game::GameEvent)s,
//! call [`App::update`] once per frame, and read snapshots back.
//!
//! # Module Structure
//!
//! - [`app_state`]: [`AppState`], the session plus everything that outlives it
//! - [`event_handler`]: [`App`] and routing of input events
//! - [`update`]: the per-frame poll
//!
//! # Event Flow
//!
//! 1. **Input**: the host sends drags, moves, commands and focus changes
//! 2. **Session**: the level session applies them and reports transitions
//! 3. **Progress**: completions are merged into [`PlayerProgress`](crate::game::PlayerProgress)
//! 4. **Save**: the record is written to the store; failures are only logged
//!
//! Everything runs on the caller's thread. Nothing here blocks on the store
//! beyond the write itself.

pub mod app_state;
pub mod event_handler;
pub mod update;

#[cfg(test)]
mod tests;

pub use app_state::{AppSnapshot, AppState};
pub use event_handler::App;
