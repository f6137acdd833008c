//! Per-frame update for [`App`].

use std::time::Instant;

use super::event_handler::App;
use crate::game::session::SessionEvent;
use crate::persist::SaveStore;

impl<S: SaveStore> App<S> {
    /// Advances the app to `now`. Call once per frame.
    ///
    /// Starts the countdown when the auto-start delay has passed, applies
    /// every timer tick that became due, and merges and saves a completion if
    /// one happened.
    ///
    /// # Returns
    /// The session transitions that happened during this frame.
    pub fn update(&mut self, now: Instant) -> Vec<SessionEvent> {
        let events = self.state.session.update(now);
        for event in &events {
            log::debug!("session event: {:?}", event);
        }
        self.process(&events);
        events
    }
}
