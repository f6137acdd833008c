//! Level session state machine.
//!
//! A [`LevelSession`] drives one level at a time through its lifecycle:
//!
//! ```text
//!            delay elapsed            solved, no drag held
//!   Fresh ─────────────────▶ Playing ─────────────────────▶ Completed
//!     ▲                        │
//!     │                        │ time_remaining == 0
//!     │                        ▼
//!     └──── reset / retry ── Failed
//!           advance / select
//! ```
//!
//! The session owns the [`PuzzleState`] of the current attempt and the single
//! live countdown ticker. Every input is applied first and the transition
//! checks run afterwards, so a move that solves the puzzle on the same frame
//! the timer runs out is judged on the geometry it produced.
//!
//! Each attempt fires at most one terminal transition. The guard for that is
//! cleared only when the session enters `Fresh` again, which is also the only
//! way out of `Completed` and `Failed`.

use crate::config::{GameConfig, MAX_LEVEL};
use crate::game::input::{DragEvent, DragState, LevelCommand};
use crate::game::progress::PlayerProgress;
use crate::game::puzzle::{PuzzleSnapshot, PuzzleState};
use crate::game::timer::{TickerId, TimerSlot};
use crate::math::Point;
use crate::tangle::generator::LayoutGenerator;
use crate::tangle::{RopeEnd, RopeId, tutorial_ropes};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Mixed into per-attempt seeds so neighbouring levels diverge.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Where an attempt is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    /// Layout shown, countdown not started yet.
    Fresh,
    Playing,
    Completed,
    Failed,
}

impl Lifecycle {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Lifecycle::Completed | Lifecycle::Failed)
    }
}

/// Transitions reported back to the owner of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SessionEvent {
    /// A new attempt was laid out and is waiting to start.
    LevelLoaded { level: u32, attempt: u32 },
    /// The countdown started.
    Started { level: u32 },
    Completed { level: u32, stars: u8, elapsed: u32 },
    Failed { level: u32 },
}

/// Result of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub stars: u8,
    pub elapsed: u32,
}

/// Read-only view of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub level: u32,
    pub attempt: u32,
    pub lifecycle: Lifecycle,
    pub time_remaining: u32,
    pub total_time: u32,
    pub result: Option<AttemptResult>,
    pub dragging: bool,
    pub suspended: bool,
    pub puzzle: PuzzleSnapshot,
}

/// Star rating for finishing in `elapsed` of `total` seconds.
///
/// The allowed time is split into thirds of `unit = total / 3` seconds
/// (integer division): finishing within one unit earns 3 stars, within two
/// earns 2, within three earns 1, and anything slower earns 0.
///
/// When `total < 3` the unit is zero, so only an instant finish
/// (`elapsed == 0`) earns stars (3) and any positive elapsed time earns 0.
///
/// # Examples
///
/// ```rust
/// use untangle::game::session::stars;
///
/// assert_eq!(stars(9, 3), 3);
/// assert_eq!(stars(9, 6), 2);
/// assert_eq!(stars(9, 9), 1);
/// assert_eq!(stars(9, 10), 0);
/// ```
pub fn stars(total: u32, elapsed: u32) -> u8 {
    let unit = total / 3;
    if elapsed <= unit {
        3
    } else if elapsed <= unit * 2 {
        2
    } else if elapsed <= unit * 3 {
        1
    } else {
        0
    }
}

/// One level being played, from layout to result.
#[derive(Debug)]
pub struct LevelSession {
    config: GameConfig,
    generator: LayoutGenerator,
    base_seed: u64,
    level: u32,
    attempt: u32,
    lifecycle: Lifecycle,
    total_time: u32,
    time_remaining: u32,
    puzzle: PuzzleState,
    timer: TimerSlot,
    /// Set once this attempt has completed or failed.
    triggered: bool,
    result: Option<AttemptResult>,
    /// When the countdown should start, while `Fresh`.
    start_due: Option<Instant>,
    suspended_at: Option<Instant>,
    drags: DragState,
    /// First rope id for the next layout. Ids are never reused within a
    /// session, so input aimed at an earlier attempt matches no rope.
    next_rope_id: u32,
}

impl LevelSession {
    /// Creates a session and lays out `level` as a fresh attempt.
    ///
    /// Without a configured seed the layouts are seeded from entropy once,
    /// and every later attempt derives its own seed from that.
    pub fn new(config: GameConfig, level: u32, now: Instant) -> Self {
        let base_seed = config
            .seed
            .unwrap_or_else(|| rand::thread_rng().next_u64());
        let generator = LayoutGenerator::with_padding(config.padding);
        let bounds = config.bounds;
        let mut session = Self {
            config,
            generator,
            base_seed,
            level: GameConfig::clamp_level(level),
            attempt: 0,
            lifecycle: Lifecycle::Fresh,
            total_time: 0,
            time_remaining: 0,
            puzzle: PuzzleState::empty(bounds),
            timer: TimerSlot::new(),
            triggered: false,
            result: None,
            start_due: None,
            suspended_at: None,
            drags: DragState::new(),
            next_rope_id: 0,
        };
        session.enter_fresh(session.level, now);
        session
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn total_time(&self) -> u32 {
        self.total_time
    }

    pub fn result(&self) -> Option<AttemptResult> {
        self.result
    }

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    /// Id of the live countdown ticker, for hosts that schedule ticks
    /// themselves and deliver them through [`LevelSession::on_tick`].
    pub fn ticker_id(&self) -> Option<TickerId> {
        self.timer.live().map(|t| t.id())
    }

    /// Advances time to `now`: starts the countdown once the auto-start
    /// delay has passed and applies every tick that became due.
    pub fn update(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.is_suspended() {
            return events;
        }

        if self.lifecycle == Lifecycle::Fresh && self.start_due.is_some_and(|due| now >= due) {
            if self.puzzle.ropes().is_empty() {
                log::debug!("level {} has no ropes, not starting", self.level);
            } else {
                events.push(self.start_playing(now));
                events.extend(self.check_completion());
            }
        }

        let ticks = self.timer.poll(now);
        for _ in 0..ticks {
            match self.apply_tick() {
                Some(event) => {
                    events.push(event);
                    break;
                }
                None if self.lifecycle != Lifecycle::Playing => break,
                None => {}
            }
        }
        events
    }

    /// Applies one tick delivered by an external scheduler.
    ///
    /// Ticks from a retired or suspended ticker are dropped.
    pub fn on_tick(&mut self, id: TickerId) -> Option<SessionEvent> {
        if !self.timer.accepts(id) {
            log::debug!("dropping stale tick from {:?}", id);
            return None;
        }
        self.apply_tick()
    }

    /// Moves one endpoint outside of any drag gesture.
    pub fn move_endpoint(&mut self, rope: RopeId, end: RopeEnd, point: Point) -> Option<SessionEvent> {
        if self.lifecycle.is_terminal() {
            log::debug!("ignoring move on {} after the attempt ended", rope);
            return None;
        }
        self.puzzle.update_endpoint(rope, end, point);
        self.check_completion()
    }

    /// Applies one drag step.
    ///
    /// Completion is not reported while any end is held; releasing the last
    /// one re-checks it.
    pub fn drag(&mut self, event: &DragEvent) -> Option<SessionEvent> {
        if self.lifecycle.is_terminal() {
            self.drags.clear();
            return None;
        }
        // Holds are cleared with every new layout, so an unknown rope is never
        // held and a stale release has nothing to let go of.
        if self.puzzle.rope(event.rope).is_none() {
            log::debug!("ignoring drag on unknown {}", event.rope);
            return None;
        }
        self.drags.apply(event);
        self.puzzle.update_endpoint(event.rope, event.end, event.point);
        self.check_completion()
    }

    /// Applies a lifecycle command.
    ///
    /// Moving to another level is checked against `progress`. A command that
    /// is not allowed right now is logged and ignored.
    pub fn apply_command(
        &mut self,
        command: LevelCommand,
        progress: &PlayerProgress,
        now: Instant,
    ) -> Option<SessionEvent> {
        let target = match command {
            LevelCommand::Reset => return Some(self.enter_fresh(self.level, now)),
            LevelCommand::Retry => {
                if !self.lifecycle.is_terminal() {
                    log::debug!("retry ignored while {:?}", self.lifecycle);
                    return None;
                }
                return Some(self.enter_fresh(self.level, now));
            }
            LevelCommand::AdvanceLevel => (self.level + 1).min(MAX_LEVEL),
            LevelCommand::SelectLevel(level) => {
                if !(1..=MAX_LEVEL).contains(&level) {
                    log::debug!("level {} does not exist", level);
                    return None;
                }
                level
            }
        };
        if !progress.is_unlocked(target) {
            log::debug!("level {} is locked", target);
            return None;
        }
        Some(self.enter_fresh(target, now))
    }

    /// Pauses the countdown and the auto-start delay.
    pub fn suspend(&mut self, now: Instant) {
        if self.suspended_at.is_none() {
            self.timer.suspend();
            self.suspended_at = Some(now);
            log::debug!("level {} suspended", self.level);
        }
    }

    /// Resumes after [`LevelSession::suspend`]. Time spent in the background
    /// is not charged to the attempt.
    pub fn resume(&mut self, now: Instant) {
        if let Some(since) = self.suspended_at.take() {
            let away = now.saturating_duration_since(since);
            self.start_due = self.start_due.map(|due| due + away);
            self.timer.resume(now);
            log::debug!("level {} resumed after {:?}", self.level, away);
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level,
            attempt: self.attempt,
            lifecycle: self.lifecycle,
            time_remaining: self.time_remaining,
            total_time: self.total_time,
            result: self.result,
            dragging: self.drags.is_active(),
            suspended: self.is_suspended(),
            puzzle: self.puzzle.snapshot(),
        }
    }

    /// Tears down the current attempt and lays out a new one at `level`.
    fn enter_fresh(&mut self, level: u32, now: Instant) -> SessionEvent {
        self.timer.retire();
        self.puzzle.reset();
        self.drags.clear();

        self.level = GameConfig::clamp_level(level);
        self.attempt += 1;
        self.lifecycle = Lifecycle::Fresh;
        self.triggered = false;
        self.result = None;
        self.total_time = self.config.time_for_level(self.level);
        self.time_remaining = self.total_time;

        let bounds = self.config.bounds;
        let first_id = self.next_rope_id;
        self.puzzle = match tutorial_ropes(self.level, &bounds, self.config.padding, first_id) {
            Some(ropes) => PuzzleState::from_ropes(ropes, bounds),
            None => {
                let mut rng = StdRng::seed_from_u64(self.attempt_seed());
                let count = self.config.rope_count_for_level(self.level);
                PuzzleState::initialize(count, first_id, bounds, &self.generator, &mut rng)
            }
        };
        self.next_rope_id = first_id.saturating_add(self.puzzle.ropes().len() as u32);

        let delay = self.config.auto_start_delay();
        self.start_due = Some(match self.suspended_at {
            // Still in the background: the delay starts counting on resume.
            Some(since) => since + delay,
            None => now + delay,
        });

        log::info!(
            "level {} attempt {}: {} ropes, {} crossings, {}s",
            self.level,
            self.attempt,
            self.puzzle.ropes().len(),
            self.puzzle.intersection_count(),
            self.total_time
        );
        SessionEvent::LevelLoaded {
            level: self.level,
            attempt: self.attempt,
        }
    }

    fn attempt_seed(&self) -> u64 {
        self.base_seed ^ u64::from(self.level).wrapping_mul(SEED_MIX) ^ u64::from(self.attempt)
    }

    fn start_playing(&mut self, now: Instant) -> SessionEvent {
        self.start_due = None;
        self.lifecycle = Lifecycle::Playing;
        let period = self.tick_period();
        self.timer.start(period, now);
        log::info!("level {} started", self.level);
        SessionEvent::Started { level: self.level }
    }

    fn tick_period(&self) -> Duration {
        self.config.tick_period()
    }

    fn apply_tick(&mut self) -> Option<SessionEvent> {
        if self.lifecycle != Lifecycle::Playing {
            return None;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return self.fail();
        }
        None
    }

    fn check_completion(&mut self) -> Option<SessionEvent> {
        if self.lifecycle != Lifecycle::Playing
            || self.triggered
            || self.drags.is_active()
            || !self.puzzle.is_solved()
        {
            return None;
        }
        self.triggered = true;
        self.timer.retire();
        let elapsed = self.total_time - self.time_remaining;
        let stars = stars(self.total_time, elapsed);
        self.lifecycle = Lifecycle::Completed;
        self.result = Some(AttemptResult { stars, elapsed });
        log::info!(
            "level {} completed in {}s with {} stars",
            self.level,
            elapsed,
            stars
        );
        Some(SessionEvent::Completed {
            level: self.level,
            stars,
            elapsed,
        })
    }

    fn fail(&mut self) -> Option<SessionEvent> {
        if self.triggered {
            return None;
        }
        self.triggered = true;
        self.timer.retire();
        self.lifecycle = Lifecycle::Failed;
        log::info!("level {} failed: out of time", self.level);
        Some(SessionEvent::Failed { level: self.level })
    }
}
