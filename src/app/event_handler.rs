//! Event handler module.
//!
//! Contains the [`App`] struct and the routing of [`GameEvent`]s into the
//! level session.

use crate::app::app_state::{AppSnapshot, AppState};
use crate::config::GameConfig;
use crate::game::input::{GameEvent, LevelCommand};
use crate::game::session::SessionEvent;
use crate::game::timer::TickerId;
use crate::persist::{SaveStore, Settings, load_or_default};
use chrono::Utc;
use std::time::Instant;

/// Main application struct: the app state plus the store it is saved to.
///
/// # Lifecycle
/// 1. Created with [`App::new`], which loads the save record (or defaults)
/// 2. Input arrives through [`App::handle_event`]
/// 3. Time advances through [`App::update`], once per frame
/// 4. Every completion and level change is written back to the store
pub struct App<S: SaveStore> {
    /// The current application state.
    pub state: AppState,
    store: S,
}

impl<S: SaveStore> App<S> {
    /// Loads the saved record from `store` and lays out its current level.
    ///
    /// # Arguments
    /// - `config`: Tunables for the session
    /// - `store`: Where the record is read from and written to
    /// - `now`: The current instant; starts the auto-start delay
    ///
    /// # Returns
    /// A ready app whose first level is `Fresh`.
    pub fn new(config: GameConfig, store: S, now: Instant) -> Self {
        let record = load_or_default(&store);
        log::info!(
            "loaded save: level {}, {} stars",
            record.current_level,
            record.player_stats.total_stars()
        );
        Self {
            state: AppState::new(config, record, now),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Routes one input event.
    ///
    /// # Arguments
    /// - `event`: The event from the presentation layer
    /// - `now`: When it happened
    ///
    /// # Returns
    /// The session transitions the event caused, in order.
    pub fn handle_event(&mut self, event: GameEvent, now: Instant) -> Vec<SessionEvent> {
        let events: Vec<SessionEvent> = match event {
            GameEvent::Drag(drag) => self.state.session.drag(&drag).into_iter().collect(),
            GameEvent::MoveEndpoint { rope, end, point } => self
                .state
                .session
                .move_endpoint(rope, end, point)
                .into_iter()
                .collect(),
            GameEvent::Command(command) => self.handle_command(command, now),
            GameEvent::Background => {
                self.state.session.suspend(now);
                Vec::new()
            }
            GameEvent::Foreground => {
                self.state.session.resume(now);
                Vec::new()
            }
        };
        self.process(&events);
        events
    }

    /// Applies a tick from an externally scheduled ticker.
    pub fn on_tick(&mut self, id: TickerId) -> Option<SessionEvent> {
        let event = self.state.session.on_tick(id);
        if let Some(event) = &event {
            self.process(std::slice::from_ref(event));
        }
        event
    }

    /// Replaces the settings and saves them.
    pub fn set_settings(&mut self, settings: Settings) {
        if self.state.settings != settings {
            self.state.settings = settings;
            self.save();
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.state.snapshot()
    }

    /// Writes the current record. Failures are logged and otherwise ignored.
    pub fn save(&mut self) {
        let record = self.state.to_record().stamped(Utc::now());
        if let Err(e) = self.store.save(&record) {
            log::warn!("failed to save progress: {}", e);
        }
    }

    fn handle_command(&mut self, command: LevelCommand, now: Instant) -> Vec<SessionEvent> {
        let state = &mut self.state;
        state
            .session
            .apply_command(command, &state.progress, now)
            .into_iter()
            .collect()
    }

    /// Applies side effects of session transitions, saving once at most.
    pub(crate) fn process(&mut self, events: &[SessionEvent]) {
        let mut dirty = false;
        for event in events {
            dirty |= self.state.apply_session_event(event);
        }
        if dirty {
            self.save();
        }
    }
}
