//! Puzzle state: the ropes of the current attempt and whether they are
//! untangled.
//!
//! [`PuzzleState`] is the only place rope endpoints change during play. Every
//! mutation clamps the new point into the play area and then recomputes the
//! crossing count over the whole rope set, so `solved` is always derived from
//! the current geometry and never from an incremental patch.

use crate::math::segment::{count_crossings, crossing_pairs};
use crate::math::{Bounds, Point};
use crate::tangle::generator::LayoutGenerator;
use crate::tangle::{Rope, RopeEnd, RopeId};
use rand::Rng;
use serde::Serialize;

/// Ropes of one attempt plus their derived crossing state.
///
/// Invariant: `solved == (intersection_count == 0 && !ropes.is_empty())`.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    ropes: Vec<Rope>,
    bounds: Bounds,
    intersection_count: usize,
    solved: bool,
}

/// Read-only copy of a [`PuzzleState`] for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSnapshot {
    pub ropes: Vec<Rope>,
    pub intersection_count: usize,
    pub solved: bool,
    /// Pairs of ropes that currently cross, for highlighting.
    pub crossings: Vec<(RopeId, RopeId)>,
}

impl PuzzleState {
    /// A puzzle with no ropes. Never solved.
    pub fn empty(bounds: Bounds) -> Self {
        Self {
            ropes: Vec::new(),
            bounds,
            intersection_count: 0,
            solved: false,
        }
    }

    /// Generates `rope_count` ropes inside `bounds`, numbered from
    /// `first_id`, and computes their initial crossing state.
    pub fn initialize<R: Rng + ?Sized>(
        rope_count: usize,
        first_id: u32,
        bounds: Bounds,
        generator: &LayoutGenerator,
        rng: &mut R,
    ) -> Self {
        let (ropes, _) = generator.generate_numbered(rope_count, first_id, &bounds, rng);
        Self::from_ropes(ropes, bounds)
    }

    /// Wraps an explicit rope list, clamping every endpoint into `bounds`.
    pub fn from_ropes(mut ropes: Vec<Rope>, bounds: Bounds) -> Self {
        for rope in ropes.iter_mut() {
            for which in [RopeEnd::Start, RopeEnd::End] {
                let clamped = bounds.clamp(rope.endpoint(which));
                rope.set_endpoint(which, clamped);
            }
        }
        let mut state = Self {
            ropes,
            bounds,
            intersection_count: 0,
            solved: false,
        };
        state.recompute();
        state
    }

    /// Moves one endpoint of rope `id` to `point`, clamped into the bounds.
    ///
    /// Unknown ids are ignored: the presentation layer may race an update
    /// against a reset. Returns whether a rope was updated.
    pub fn update_endpoint(&mut self, id: RopeId, which: RopeEnd, point: Point) -> bool {
        let clamped = self.bounds.clamp(point);
        let Some(rope) = self.ropes.iter_mut().find(|r| r.id() == id) else {
            log::debug!("ignoring update for unknown {}", id);
            return false;
        };
        rope.set_endpoint(which, clamped);
        self.recompute();
        true
    }

    /// Drops every rope. The state stays unsolved until re-initialized.
    pub fn reset(&mut self) {
        self.ropes.clear();
        self.recompute();
    }

    pub fn ropes(&self) -> &[Rope] {
        &self.ropes
    }

    pub fn rope(&self, id: RopeId) -> Option<&Rope> {
        self.ropes.iter().find(|r| r.id() == id)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn intersection_count(&self) -> usize {
        self.intersection_count
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Rope id pairs that currently cross.
    pub fn crossing_pairs(&self) -> Vec<(RopeId, RopeId)> {
        crossing_pairs(&self.ropes)
            .into_iter()
            .map(|(i, j)| (self.ropes[i].id(), self.ropes[j].id()))
            .collect()
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            ropes: self.ropes.clone(),
            intersection_count: self.intersection_count,
            solved: self.solved,
            crossings: self.crossing_pairs(),
        }
    }

    fn recompute(&mut self) {
        self.intersection_count = count_crossings(&self.ropes);
        self.solved = self.intersection_count == 0 && !self.ropes.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tangle::rope_color;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds() -> Bounds {
        Bounds::new(0.0, 100.0, 0.0, 100.0).unwrap()
    }

    fn two_rope_x() -> PuzzleState {
        PuzzleState::from_ropes(
            vec![
                Rope::new(RopeId(1), Point::new(0.0, 0.0), Point::new(10.0, 10.0), rope_color(0)),
                Rope::new(RopeId(2), Point::new(0.0, 10.0), Point::new(10.0, 0.0), rope_color(1)),
            ],
            bounds(),
        )
    }

    #[test]
    fn test_moving_an_end_untangles_two_ropes() {
        let mut puzzle = two_rope_x();
        assert_eq!(puzzle.intersection_count(), 1);
        assert!(!puzzle.is_solved());
        assert_eq!(puzzle.crossing_pairs(), vec![(RopeId(1), RopeId(2))]);

        assert!(puzzle.update_endpoint(RopeId(2), RopeEnd::End, Point::new(20.0, 20.0)));
        assert_eq!(puzzle.intersection_count(), 0);
        assert!(puzzle.is_solved());
        assert!(puzzle.crossing_pairs().is_empty());
    }

    #[test]
    fn test_same_update_twice_is_idempotent() {
        let mut puzzle = two_rope_x();
        puzzle.update_endpoint(RopeId(1), RopeEnd::Start, Point::new(5.0, 40.0));
        let first = puzzle.intersection_count();
        puzzle.update_endpoint(RopeId(1), RopeEnd::Start, Point::new(5.0, 40.0));
        assert_eq!(puzzle.intersection_count(), first);
        assert_eq!(puzzle.snapshot(), puzzle.snapshot());
    }

    #[test]
    fn test_unknown_rope_is_a_silent_no_op() {
        let mut puzzle = two_rope_x();
        let before = puzzle.snapshot();
        assert!(!puzzle.update_endpoint(RopeId(99), RopeEnd::Start, Point::new(50.0, 50.0)));
        assert_eq!(puzzle.snapshot(), before);
    }

    #[test]
    fn test_updates_are_clamped_into_bounds() {
        let mut puzzle = two_rope_x();
        puzzle.update_endpoint(RopeId(1), RopeEnd::End, Point::new(250.0, -30.0));
        let rope = puzzle.rope(RopeId(1)).unwrap();
        assert_eq!(rope.end(), Point::new(100.0, 0.0));
        assert!(puzzle.bounds().contains(rope.end()));
    }

    #[test]
    fn test_from_ropes_clamps_out_of_range_input() {
        let puzzle = PuzzleState::from_ropes(
            vec![Rope::new(
                RopeId(0),
                Point::new(-10.0, 50.0),
                Point::new(50.0, 500.0),
                rope_color(0),
            )],
            bounds(),
        );
        let rope = &puzzle.ropes()[0];
        assert_eq!(rope.start(), Point::new(0.0, 50.0));
        assert_eq!(rope.end(), Point::new(50.0, 100.0));
        // One rope, nothing to cross: solved.
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_reset_and_empty_are_never_solved() {
        let mut puzzle = two_rope_x();
        puzzle.reset();
        assert!(puzzle.ropes().is_empty());
        assert_eq!(puzzle.intersection_count(), 0);
        assert!(!puzzle.is_solved());
        assert!(!PuzzleState::empty(bounds()).is_solved());
    }

    #[test]
    fn test_initialize_starts_tangled() {
        let mut rng = StdRng::seed_from_u64(11);
        let puzzle =
            PuzzleState::initialize(6, 12, bounds(), &LayoutGenerator::default(), &mut rng);
        assert_eq!(puzzle.ropes().len(), 6);
        assert!(puzzle.rope(RopeId(12)).is_some());
        assert!(puzzle.rope(RopeId(0)).is_none());
        assert!(puzzle.intersection_count() >= 1);
        assert!(!puzzle.is_solved());
    }
}
