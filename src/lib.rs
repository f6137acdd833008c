//! Untangle - rope untangling puzzle core
//!
//! This crate is the game logic behind a puzzle where the player drags the
//! ends of straight ropes around a board until no two ropes cross. It owns
//! everything except drawing and gesture capture: layout generation, crossing
//! detection, the level lifecycle with its countdown and star rating, player
//! progress, and saving.
//!
//! # Features
//! - **Geometry**: exact segment crossing tests with a fixed parallel epsilon
//! - **Procedural Layouts**: seeded generation that always starts tangled
//! - **Level Lifecycle**: fresh, playing, completed and failed, driven by an
//!   injected clock
//! - **Progression**: best stars per level, unlocks, JSON save record
//!
//! # Architecture
//! - `math/`: points, bounds and segment intersection
//! - `tangle/`: ropes, tutorial fixtures and the layout generator
//! - `game/`: puzzle state, level session, timer, progress and input events
//! - `app/`: the facade a host drives once per frame
//! - `config`, `persist`, `error`: tunables, save stores and their errors
//!
//! # Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use untangle::app::App;
//! use untangle::config::GameConfig;
//! use untangle::game::Lifecycle;
//! use untangle::persist::MemoryStore;
//!
//! let t0 = Instant::now();
//! let mut app = App::new(GameConfig::default(), MemoryStore::new(), t0);
//! assert_eq!(app.state.session.lifecycle(), Lifecycle::Fresh);
//!
//! app.update(t0 + Duration::from_millis(500));
//! assert_eq!(app.state.session.lifecycle(), Lifecycle::Playing);
//! assert!(app.snapshot().session.puzzle.intersection_count >= 1);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod math;
pub mod persist;
pub mod tangle;
