//! App scenario tests
//!
//! These drive [`App`] the way a host would: input events, per-frame updates
//! and an injected clock. They cover the flows that cross module boundaries,
//! where a session transition has to reach progress and the store.

use super::App;
use crate::config::GameConfig;
use crate::error::PersistError;
use crate::game::input::{DragEvent, DragPhase, GameEvent, LevelCommand};
use crate::game::progress::PlayerProgress;
use crate::game::session::{Lifecycle, SessionEvent};
use crate::math::Point;
use crate::persist::{JsonFileStore, MemoryStore, SaveRecord, SaveStore, Settings};
use crate::tangle::{RopeEnd, RopeId};
use std::io;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const SECOND: Duration = Duration::from_secs(1);

/// A store whose disk is always broken.
struct FailingStore;

impl SaveStore for FailingStore {
    fn load(&self) -> Result<Option<SaveRecord>, PersistError> {
        Err(PersistError::InvalidRecord("unreadable".into()))
    }

    fn save(&mut self, _record: &SaveRecord) -> Result<(), PersistError> {
        Err(PersistError::Io(io::Error::other("disk full")))
    }
}

fn config() -> GameConfig {
    GameConfig {
        seed: Some(21),
        ..GameConfig::default()
    }
}

/// Runs the auto-start delay and returns when the countdown began.
fn start<S: SaveStore>(app: &mut App<S>, now: Instant) -> Instant {
    let start = now + app.state.session.config().auto_start_delay();
    let events = app.update(start);
    assert!(matches!(events.as_slice(), [SessionEvent::Started { .. }]));
    start
}

/// Parks every rope as a short stub on the left edge.
fn untangle<S: SaveStore>(app: &mut App<S>, now: Instant) -> Vec<SessionEvent> {
    let ids: Vec<RopeId> = app
        .state
        .session
        .puzzle()
        .ropes()
        .iter()
        .map(|r| r.id())
        .collect();
    let mut events = Vec::new();
    for (i, rope) in ids.into_iter().enumerate() {
        let y = 5.0 + 10.0 * i as f64;
        for (end, x) in [(RopeEnd::Start, 0.0), (RopeEnd::End, 5.0)] {
            let point = Point::new(x, y);
            events.extend(app.handle_event(GameEvent::MoveEndpoint { rope, end, point }, now));
        }
    }
    events
}

fn completed_stars(events: &[SessionEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Completed { stars, .. } => Some(*stars),
            _ => None,
        })
        .collect()
}

#[test]
fn test_completion_updates_progress_and_saves() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);
    app.update(start + 4 * SECOND);

    let events = untangle(&mut app, start + 4 * SECOND);
    assert_eq!(
        events,
        vec![SessionEvent::Completed {
            level: 1,
            stars: 3,
            elapsed: 4
        }]
    );
    assert_eq!(app.state.progress.best_stars(1), 3);
    assert_eq!(app.state.progress.highest_unlocked_level(), 2);

    assert_eq!(app.store().saves(), 1);
    let saved = app.store().record().unwrap();
    assert_eq!(saved.current_level, 1);
    assert_eq!(saved.player_stats, app.state.progress);
    assert!(saved.saved_at.is_some());
}

#[test]
fn test_advance_after_completion_saves_new_level() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);
    untangle(&mut app, start);

    let events = app.handle_event(GameEvent::Command(LevelCommand::AdvanceLevel), start);
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::LevelLoaded { level: 2, .. }]
    ));
    assert_eq!(app.state.session.lifecycle(), Lifecycle::Fresh);
    assert_eq!(app.store().saves(), 2);
    assert_eq!(app.store().record().unwrap().current_level, 2);
}

#[test]
fn test_level_five_keeps_best_stars() {
    let mut stats = PlayerProgress::new();
    for level in 1..=4 {
        stats.record_completion(level, 1);
    }
    let record = SaveRecord {
        current_level: 5,
        player_stats: stats,
        ..SaveRecord::default()
    };
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::with_record(record), t0);
    assert_eq!(app.state.session.level(), 5);
    assert_eq!(app.state.session.total_time(), 42);

    // 20 of 42 seconds: two stars.
    let first = start(&mut app, t0);
    app.update(first + 20 * SECOND);
    let events = untangle(&mut app, first + 20 * SECOND);
    assert_eq!(completed_stars(&events), vec![2]);
    assert_eq!(app.state.progress.best_stars(5), 2);
    let total = app.state.progress.total_stars();

    // 35 of 42 seconds: one star, which must not replace the two.
    let retry_at = first + 30 * SECOND;
    app.handle_event(GameEvent::Command(LevelCommand::Retry), retry_at);
    let second = start(&mut app, retry_at);
    app.update(second + 35 * SECOND);
    let events = untangle(&mut app, second + 35 * SECOND);
    assert_eq!(completed_stars(&events), vec![1]);

    assert_eq!(app.state.progress.best_stars(5), 2);
    assert_eq!(app.state.progress.total_stars(), total);
    assert_eq!(app.state.progress.total_stars(), 4 + 2);
}

#[test]
fn test_failure_leaves_progress_alone() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);

    let events = app.update(start + 31 * SECOND);
    assert_eq!(events, vec![SessionEvent::Failed { level: 1 }]);
    assert_eq!(app.state.progress, PlayerProgress::new());
    assert_eq!(app.store().saves(), 0);
}

#[test]
fn test_save_failures_do_not_block_play() {
    let t0 = Instant::now();
    let mut app = App::new(config(), FailingStore, t0);
    assert_eq!(app.state.session.level(), 1);

    let start = start(&mut app, t0);
    let events = untangle(&mut app, start);
    assert_eq!(completed_stars(&events), vec![3]);
    assert_eq!(app.state.progress.best_stars(1), 3);

    let events = app.handle_event(GameEvent::Command(LevelCommand::AdvanceLevel), start);
    assert_eq!(events.len(), 1);
    assert_eq!(app.state.session.level(), 2);
}

#[test]
fn test_file_store_resumes_progress() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.json");
    let t0 = Instant::now();

    {
        let mut app = App::new(config(), JsonFileStore::new(&path), t0);
        let start = start(&mut app, t0);
        untangle(&mut app, start);
        app.handle_event(GameEvent::Command(LevelCommand::AdvanceLevel), start);
    }

    let app = App::new(config(), JsonFileStore::new(&path), t0);
    assert_eq!(app.state.session.level(), 2);
    assert_eq!(app.state.progress.best_stars(1), 3);
    assert_eq!(app.state.progress.highest_unlocked_level(), 2);
}

#[test]
fn test_locked_saved_level_is_pulled_back() {
    let record = SaveRecord {
        current_level: 9,
        ..SaveRecord::default()
    };
    let app = App::new(config(), MemoryStore::with_record(record), Instant::now());
    assert_eq!(app.state.session.level(), 1);
}

#[test]
fn test_drag_release_completes_level() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);

    let hold = DragEvent {
        rope: app.state.session.puzzle().ropes()[0].id(),
        end: RopeEnd::Start,
        point: Point::new(0.0, 5.0),
        phase: DragPhase::Start,
    };
    assert!(app.handle_event(GameEvent::Drag(hold), start).is_empty());
    assert!(untangle(&mut app, start).is_empty());
    assert_eq!(app.store().saves(), 0);

    let release = DragEvent {
        phase: DragPhase::End,
        ..hold
    };
    let events = app.handle_event(GameEvent::Drag(release), start);
    assert_eq!(completed_stars(&events), vec![3]);
    assert_eq!(app.store().saves(), 1);
}

#[test]
fn test_background_pauses_the_clock() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);

    app.handle_event(GameEvent::Background, start + SECOND / 2);
    assert!(app.update(start + 50 * SECOND).is_empty());
    assert_eq!(app.state.session.time_remaining(), 30);
    assert!(app.snapshot().session.suspended);

    app.handle_event(GameEvent::Foreground, start + 50 * SECOND);
    app.update(start + 51 * SECOND);
    assert_eq!(app.state.session.time_remaining(), 29);
}

#[test]
fn test_stale_external_tick_after_reset() {
    let t0 = Instant::now();
    let mut app = App::new(config(), MemoryStore::new(), t0);
    let start = start(&mut app, t0);
    let id = app.state.session.ticker_id().unwrap();

    assert!(app.on_tick(id).is_none());
    assert_eq!(app.state.session.time_remaining(), 29);

    app.handle_event(GameEvent::Command(LevelCommand::Reset), start);
    assert!(app.on_tick(id).is_none());
    assert_eq!(app.state.session.time_remaining(), 30);
}

#[test]
fn test_settings_changes_are_saved_once() {
    let mut app = App::new(config(), MemoryStore::new(), Instant::now());
    let settings = Settings {
        show_crossing_markers: true,
        ..Settings::default()
    };
    app.set_settings(settings);
    app.set_settings(settings);
    assert_eq!(app.store().saves(), 1);
    assert_eq!(app.store().record().unwrap().settings, settings);
}

#[test]
fn test_snapshot_serializes_for_the_host() {
    let app = App::new(config(), MemoryStore::new(), Instant::now());
    let json = serde_json::to_value(app.snapshot()).unwrap();
    assert_eq!(json["session"]["lifecycle"], "fresh");
    assert_eq!(json["session"]["level"], 1);
    assert_eq!(json["progress"]["highestUnlockedLevel"], 1);
    assert_eq!(json["settings"]["showCrossingMarkers"], false);
    assert_eq!(
        json["session"]["puzzle"]["ropes"].as_array().unwrap().len(),
        2
    );
}

#[test]
fn test_session_owns_the_config() {
    let config = GameConfig {
        auto_start_delay_ms: 0,
        ..config()
    };
    let t0 = Instant::now();
    let mut app = App::new(config.clone(), MemoryStore::new(), t0);
    assert_eq!(app.state.session.config(), &config);

    let events = app.update(t0);
    assert!(matches!(events.as_slice(), [SessionEvent::Started { level: 1 }]));
}
