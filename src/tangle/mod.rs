//! Ropes, the tutorial fixtures, and layout generation.
//!
//! This module defines the [`Rope`] type the rest of the crate works with,
//! the fixed palette ropes are colored from, and the hand-authored layouts
//! for the first five levels. Procedural layouts for every later level come
//! from [`generator`].

pub mod generator;

use crate::math::segment::{AsSegment, Segment};
use crate::math::{Bounds, Point};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed display palette. Colors cycle by rope index.
pub const ROPE_PALETTE: [&str; 8] = [
    "#e63946", // red
    "#f4a261", // orange
    "#e9c46a", // yellow
    "#2a9d8f", // teal
    "#457b9d", // blue
    "#8e44ad", // purple
    "#ff6fb5", // pink
    "#6c757d", // slate
];

/// Palette color for the rope at `index`.
pub fn rope_color(index: usize) -> &'static str {
    ROPE_PALETTE[index % ROPE_PALETTE.len()]
}

/// Stable identifier of a rope within one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RopeId(pub u32);

impl fmt::Display for RopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rope-{}", self.0)
    }
}

/// Which end of a rope an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RopeEnd {
    Start,
    End,
}

/// A rope on the board: a segment between two draggable endpoints.
///
/// The id and color are fixed at creation. Endpoints only change through the
/// crate (generation and [`crate::game::puzzle::PuzzleState`]), which keeps
/// them clamped inside the play area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rope {
    id: RopeId,
    start: Point,
    end: Point,
    color: &'static str,
}

impl Rope {
    pub fn new(id: RopeId, start: Point, end: Point, color: &'static str) -> Self {
        Self {
            id,
            start,
            end,
            color,
        }
    }

    pub fn id(&self) -> RopeId {
        self.id
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn endpoint(&self, which: RopeEnd) -> Point {
        match which {
            RopeEnd::Start => self.start,
            RopeEnd::End => self.end,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    pub(crate) fn set_endpoint(&mut self, which: RopeEnd, p: Point) {
        match which {
            RopeEnd::Start => self.start = p,
            RopeEnd::End => self.end = p,
        }
    }
}

impl AsSegment for Rope {
    fn segment(&self) -> Segment {
        Segment::new(self.start, self.end)
    }
}

/// Number of levels with a hand-authored layout.
pub const TUTORIAL_LEVEL_COUNT: u32 = 5;

/// A hand-authored layout. Coordinates are fractions of the padded play area,
/// `(0, 0)` being its min corner and `(1, 1)` its max corner.
#[derive(Debug, Clone)]
pub struct TutorialLayout {
    pub level: u32,
    pub ropes: Vec<((f64, f64), (f64, f64))>,
}

lazy_static! {
    /// Layouts for levels 1 through 5. Every one of them starts tangled.
    pub static ref TUTORIAL_LAYOUTS: Vec<TutorialLayout> = vec![
        TutorialLayout {
            level: 1,
            ropes: vec![((0.2, 0.2), (0.8, 0.8)), ((0.2, 0.8), (0.8, 0.2))],
        },
        TutorialLayout {
            level: 2,
            ropes: vec![
                ((0.2, 0.2), (0.8, 0.8)),
                ((0.2, 0.8), (0.8, 0.2)),
                ((0.5, 0.1), (0.5, 0.9)),
            ],
        },
        TutorialLayout {
            level: 3,
            ropes: vec![
                ((0.1, 0.3), (0.9, 0.3)),
                ((0.3, 0.1), (0.3, 0.9)),
                ((0.6, 0.2), (0.9, 0.8)),
            ],
        },
        TutorialLayout {
            level: 4,
            ropes: vec![
                ((0.1, 0.1), (0.9, 0.4)),
                ((0.1, 0.4), (0.9, 0.1)),
                ((0.1, 0.6), (0.9, 0.9)),
                ((0.1, 0.9), (0.9, 0.6)),
            ],
        },
        TutorialLayout {
            level: 5,
            ropes: vec![
                ((0.15, 0.2), (0.85, 0.8)),
                ((0.15, 0.8), (0.85, 0.2)),
                ((0.5, 0.1), (0.5, 0.9)),
                ((0.1, 0.5), (0.9, 0.5)),
            ],
        },
    ];
}

/// Builds the ropes for a tutorial level, or `None` if `level` has no
/// hand-authored layout.
///
/// Ids run from `first_id` upwards in fixture order; colors follow the
/// fixture index.
pub fn tutorial_ropes(
    level: u32,
    bounds: &Bounds,
    padding: f64,
    first_id: u32,
) -> Option<Vec<Rope>> {
    let layout = TUTORIAL_LAYOUTS.iter().find(|l| l.level == level)?;
    let area = bounds.shrink(padding);
    let place = |(fx, fy): (f64, f64)| {
        area.clamp(Point::new(
            area.min_x() + fx * area.width(),
            area.min_y() + fy * area.height(),
        ))
    };
    Some(
        layout
            .ropes
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| {
                let id = RopeId(first_id.saturating_add(i as u32));
                Rope::new(id, place(a), place(b), rope_color(i))
            })
            .collect(),
    )
}
