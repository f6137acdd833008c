//! Math utilities and types for the 2D play area.
//!
//! This module provides the point and rectangle types every other part of the
//! crate is expressed in, plus the small amount of trigonometry the layout
//! generator needs.
//!
//! # Module Organization
//!
//! - [`segment`] contains the segment intersection tests and crossing counts
//! - [`Point`], [`Bounds`] and the polar helper are provided at root level

pub mod segment;

use serde::{Deserialize, Serialize};

/// A position in play-area coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Point at `angle` radians and `radius` units away from `center`.
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point::new(v.0, v.1)
    }
}

/// Axis-aligned rectangle that ropes and their endpoints must stay inside.
///
/// A `Bounds` always satisfies `min_x < max_x` and `min_y < max_y`; the only
/// way to build one is through [`Bounds::new`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct Bounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBounds {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = String;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Bounds::new(raw.min_x, raw.max_x, raw.min_y, raw.max_y).ok_or_else(|| {
            format!(
                "invalid bounds x=[{}, {}] y=[{}, {}]",
                raw.min_x, raw.max_x, raw.min_y, raw.max_y
            )
        })
    }
}

impl From<Bounds> for RawBounds {
    fn from(b: Bounds) -> Self {
        Self {
            min_x: b.min_x,
            max_x: b.max_x,
            min_y: b.min_y,
            max_y: b.max_y,
        }
    }
}

impl Bounds {
    /// Portrait phone-sized play area used when nothing else is configured.
    pub const DEFAULT_PLAY_AREA: Bounds = Bounds {
        min_x: 0.0,
        max_x: 360.0,
        min_y: 0.0,
        max_y: 640.0,
    };

    /// Creates a rectangle, or `None` when either axis is empty, inverted or
    /// not finite.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Option<Self> {
        let finite = [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite());
        if finite && min_x < max_x && min_y < max_y {
            Some(Self {
                min_x,
                max_x,
                min_y,
                max_y,
            })
        } else {
            None
        }
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Returns the nearest point to `p` that lies inside the rectangle.
    ///
    /// Non-finite coordinates collapse onto the matching center coordinate so
    /// a bad input can never escape the play area.
    pub fn clamp(&self, p: Point) -> Point {
        let c = self.center();
        let x = if p.x.is_finite() { p.x } else { c.x };
        let y = if p.y.is_finite() { p.y } else { c.y };
        Point::new(
            x.clamp(self.min_x, self.max_x),
            y.clamp(self.min_y, self.max_y),
        )
    }

    /// Shrinks every side by `padding`.
    ///
    /// The padding is capped at a quarter of the smaller side, so the result
    /// is always a valid, non-empty rectangle centered on the original.
    pub fn shrink(&self, padding: f64) -> Self {
        let cap = self.width().min(self.height()) / 4.0;
        let pad = padding.max(0.0).min(cap);
        Self {
            min_x: self.min_x + pad,
            max_x: self.max_x - pad,
            min_y: self.min_y + pad,
            max_y: self.max_y - pad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_rejects_empty_axes() {
        assert!(Bounds::new(0.0, 0.0, 0.0, 10.0).is_none());
        assert!(Bounds::new(0.0, 10.0, 5.0, 1.0).is_none());
        assert!(Bounds::new(0.0, f64::NAN, 0.0, 1.0).is_none());
        assert!(Bounds::new(0.0, 10.0, 0.0, 10.0).is_some());
    }

    #[test]
    fn test_clamp_keeps_points_inside() {
        let b = Bounds::new(0.0, 100.0, 0.0, 50.0).unwrap();
        assert_eq!(b.clamp(Point::new(-5.0, 70.0)), Point::new(0.0, 50.0));
        assert_eq!(b.clamp(Point::new(20.0, 20.0)), Point::new(20.0, 20.0));
        assert_eq!(b.clamp(Point::new(f64::NAN, 10.0)), Point::new(50.0, 10.0));
    }

    #[test]
    fn test_shrink_caps_padding() {
        let b = Bounds::new(0.0, 400.0, 0.0, 600.0).unwrap();
        let inner = b.shrink(40.0);
        assert_eq!(inner.min_x(), 40.0);
        assert_eq!(inner.max_y(), 560.0);

        let tiny = Bounds::new(0.0, 8.0, 0.0, 8.0).unwrap();
        let inner = tiny.shrink(40.0);
        assert_eq!(inner.min_x(), 2.0);
        assert_eq!(inner.max_x(), 6.0);
        assert_eq!(inner.center(), tiny.center());
    }
}
