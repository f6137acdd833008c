//! Segment intersection and crossing counts.
//!
//! # Overview
//!
//! Every rope on the board is a straight segment, so deciding whether a
//! puzzle is solved reduces to pairwise segment intersection:
//!
//! * [`intersects`] - the parametric two-segment test
//! * [`count_crossings`] - exact number of crossing pairs, O(n²)
//! * [`is_untangled`] - the solved predicate
//!
//! Nothing here keeps state between calls. Counts are recomputed from scratch
//! every time, so they stay exact no matter how the endpoints were moved.

use super::Point;

/// Denominators smaller than this are treated as parallel segments.
pub const PARALLEL_EPSILON: f64 = 1e-4;

/// A finite straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }

    /// The same segment with its endpoints swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.b, self.a)
    }
}

/// Anything that occupies a segment on the board.
pub trait AsSegment {
    fn segment(&self) -> Segment;
}

impl AsSegment for Segment {
    fn segment(&self) -> Segment {
        *self
    }
}

/// Tests whether two segments intersect within their finite extents.
///
/// Solves `a.a + t·(a.b - a.a) = b.a + u·(b.b - b.a)`. When the cross product
/// of the two direction vectors is below [`PARALLEL_EPSILON`] in magnitude the
/// segments are considered parallel and never intersect, collinear overlaps
/// included. Otherwise they intersect iff both `t` and `u` lie in `[0, 1]`,
/// so segments that merely touch at an endpoint count as crossing.
pub fn intersects(a: &Segment, b: &Segment) -> bool {
    let (rx, ry) = (a.b.x - a.a.x, a.b.y - a.a.y);
    let (sx, sy) = (b.b.x - b.a.x, b.b.y - b.a.y);

    let denom = rx * sy - ry * sx;
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let (qx, qy) = (b.a.x - a.a.x, b.a.y - a.a.y);
    let t = (qx * sy - qy * sx) / denom;
    let u = (qx * ry - qy * rx) / denom;

    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Visits every index pair `(i, j)` with `i < j` whose segments intersect.
fn for_each_crossing<T: AsSegment>(items: &[T], mut visit: impl FnMut(usize, usize)) {
    let segments: Vec<Segment> = items.iter().map(AsSegment::segment).collect();
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            if intersects(&segments[i], &segments[j]) {
                visit(i, j);
            }
        }
    }
}

/// Index pairs `(i, j)` with `i < j` whose segments intersect.
pub fn crossing_pairs<T: AsSegment>(items: &[T]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for_each_crossing(items, |i, j| pairs.push((i, j)));
    pairs
}

/// Number of unordered intersecting pairs.
pub fn count_crossings<T: AsSegment>(items: &[T]) -> usize {
    let mut count = 0;
    for_each_crossing(items, |_, _| count += 1);
    count
}

/// True iff there is at least one item and no two of them cross.
pub fn is_untangled<T: AsSegment>(items: &[T]) -> bool {
    !items.is_empty() && count_crossings(items) == 0
}
