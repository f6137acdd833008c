//! Countdown ticker for level attempts.
//!
//! A [`Ticker`] fires once per period while running. It is polled with an
//! explicit `Instant` rather than reading the clock itself, so the session
//! decides what "now" is and tests never sleep.
//!
//! [`TimerSlot`] owns at most one live ticker. Starting a new one always
//! stops the previous one first, and every ticker carries a [`TickerId`] so a
//! tick scheduled by a retired ticker can be recognised and dropped.

use std::time::{Duration, Instant};

/// Identity of one ticker. Ids are never reused within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    Running,
    /// Paused while the app is in the background. Missed ticks are dropped.
    Suspended,
    /// Retired. A stopped ticker never fires again.
    Stopped,
}

/// Periodic one-tick-per-period timer.
#[derive(Debug)]
pub struct Ticker {
    id: TickerId,
    period: Duration,
    state: TickerState,
    next_due: Instant,
}

impl Ticker {
    fn start(id: TickerId, period: Duration, now: Instant) -> Self {
        Self {
            id,
            period,
            state: TickerState::Running,
            next_due: now + period,
        }
    }

    pub fn id(&self) -> TickerId {
        self.id
    }

    pub fn state(&self) -> TickerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TickerState::Running
    }

    /// Number of ticks that became due by `now`.
    ///
    /// Returns 0 unless the ticker is running. A poll that arrives late while
    /// running reports every period that elapsed.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if !self.is_running() || now < self.next_due {
            return 0;
        }
        let late = now.duration_since(self.next_due).as_nanos();
        let ticks = 1 + late / self.period.as_nanos().max(1);
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.next_due += self.period * ticks;
        ticks
    }

    /// Pauses the ticker. Time spent suspended is never caught up.
    pub fn suspend(&mut self) {
        if self.state == TickerState::Running {
            self.state = TickerState::Suspended;
        }
    }

    /// Resumes a suspended ticker; the next tick is one full period after
    /// `now`.
    pub fn resume(&mut self, now: Instant) {
        if self.state == TickerState::Suspended {
            self.state = TickerState::Running;
            self.next_due = now + self.period;
        }
    }

    pub fn stop(&mut self) {
        self.state = TickerState::Stopped;
    }
}

/// Holder for the single live ticker of a level session.
#[derive(Debug, Default)]
pub struct TimerSlot {
    live: Option<Ticker>,
    issued: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retires any live ticker, then starts a fresh one.
    pub fn start(&mut self, period: Duration, now: Instant) -> TickerId {
        self.retire();
        self.issued += 1;
        let id = TickerId(self.issued);
        self.live = Some(Ticker::start(id, period, now));
        log::debug!("ticker {:?} started, period {:?}", id, period);
        id
    }

    /// Stops and drops the live ticker, if any. Its id stops being accepted.
    pub fn retire(&mut self) {
        if let Some(mut ticker) = self.live.take() {
            ticker.stop();
            log::debug!("ticker {:?} retired", ticker.id());
        }
    }

    pub fn live(&self) -> Option<&Ticker> {
        self.live.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.live.as_ref().is_some_and(Ticker::is_running)
    }

    /// Whether a tick scheduled by ticker `id` may still be applied.
    pub fn accepts(&self, id: TickerId) -> bool {
        self.live
            .as_ref()
            .is_some_and(|t| t.id() == id && t.is_running())
    }

    pub fn poll(&mut self, now: Instant) -> u32 {
        self.live.as_mut().map_or(0, |t| t.poll(now))
    }

    pub fn suspend(&mut self) {
        if let Some(ticker) = self.live.as_mut() {
            ticker.suspend();
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let Some(ticker) = self.live.as_mut() {
            ticker.resume(now);
        }
    }
}
