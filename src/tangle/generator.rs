//! Procedural rope layouts that always start tangled.
//!
//! This module produces the opening layout for every generated level. A
//! layout is only useful if there is something to untangle, so the
//! generator guarantees at least one crossing for two or more ropes.
//!
//! # Algorithm
//!
//! 1. Shrink the play area by the inner padding and take its center and an
//!    effective radius.
//! 2. Place each rope's endpoints at angles distributed around the center,
//!    with bounded jitter on angle and radius so two generations differ.
//! 3. Clamp every endpoint into the padded area.
//! 4. While nothing crosses, nudge every endpoint by a small random offset
//!    proportional to its rope's length, up to a fixed number of attempts.
//! 5. If the layout is still untangled, force the first two ropes into an X
//!    through the center.
//!
//! Randomness is always supplied by the caller, so a seeded generator gives
//! reproducible layouts.
//!
//! # Examples
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use untangle::math::Bounds;
//! use untangle::math::segment::count_crossings;
//! use untangle::tangle::generator::LayoutGenerator;
//!
//! let bounds = Bounds::new(0.0, 360.0, 0.0, 640.0).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let ropes = LayoutGenerator::default().generate(6, &bounds, &mut rng);
//!
//! assert_eq!(ropes.len(), 6);
//! assert!(count_crossings(&ropes) >= 1);
//! ```

use super::{Rope, RopeEnd, RopeId, rope_color};
use crate::math::segment::count_crossings;
use crate::math::{Bounds, Point};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Default inset between the play area edge and any generated endpoint.
pub const DEFAULT_PADDING: f64 = 30.0;
/// How many perturbation rounds run before falling back to a forced crossing.
pub const MAX_ATTEMPTS: u32 = 15;
/// Perturbation offsets never exceed this many units.
pub const MAX_PERTURBATION: f64 = 25.0;
/// Perturbation offsets never exceed this fraction of the rope's length.
pub const PERTURBATION_RATIO: f64 = 0.1;

/// Outcome details of a single generation, mostly for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationReport {
    /// Perturbation rounds that ran before a crossing appeared.
    pub attempts: u32,
    /// Whether the forced-crossing fallback had to be applied.
    pub used_fallback: bool,
}

/// Tunable parameters for layout generation.
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    /// Inset applied to the play area before placing endpoints.
    pub padding: f64,
    /// Perturbation rounds before the forced-crossing fallback.
    pub max_attempts: u32,
    /// Maximum angular jitter per rope, in radians.
    pub angle_jitter: f64,
    /// Maximum radius shrink per endpoint, as a fraction of the radius.
    pub radius_jitter: f64,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            max_attempts: MAX_ATTEMPTS,
            angle_jitter: 0.25,
            radius_jitter: 0.2,
        }
    }
}

impl LayoutGenerator {
    /// Creates a generator with the default tuning and the given padding.
    pub fn with_padding(padding: f64) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    /// Generates `rope_count` ropes inside `bounds`.
    ///
    /// See [`LayoutGenerator::generate_with_report`].
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rope_count: usize,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Vec<Rope> {
        self.generate_with_report(rope_count, bounds, rng).0
    }

    /// Generates `rope_count` ropes inside `bounds` and reports how the
    /// crossing guarantee was met.
    ///
    /// # Guarantees
    /// - Every endpoint lies inside `bounds` shrunk by [`Self::padding`].
    /// - At least one pair of ropes crosses whenever `rope_count >= 2`.
    /// - Ropes get ids `0..rope_count` in order and palette colors
    ///   round-robin.
    ///
    /// A `rope_count` of zero yields no ropes; a single rope skips the
    /// crossing check entirely.
    pub fn generate_with_report<R: Rng + ?Sized>(
        &self,
        rope_count: usize,
        bounds: &Bounds,
        rng: &mut R,
    ) -> (Vec<Rope>, GenerationReport) {
        self.generate_numbered(rope_count, 0, bounds, rng)
    }

    /// Same as [`LayoutGenerator::generate_with_report`], with ids counting
    /// up from `first_id` instead of zero.
    pub fn generate_numbered<R: Rng + ?Sized>(
        &self,
        rope_count: usize,
        first_id: u32,
        bounds: &Bounds,
        rng: &mut R,
    ) -> (Vec<Rope>, GenerationReport) {
        if rope_count == 0 {
            return (Vec::new(), GenerationReport::default());
        }

        let area = bounds.shrink(self.padding);
        let center = area.center();
        let radius = area.width().min(area.height()) / 2.0 * 0.85;

        let placements = match rope_count {
            1 => vec![self.diameter(center, radius, rng.gen_range(0.0..PI), rng)],
            2 => {
                let base = rng.gen_range(0.0..PI);
                let cross = base + FRAC_PI_2 + jitter(rng, self.angle_jitter);
                vec![
                    self.diameter(center, radius, base, rng),
                    self.diameter(center, radius, cross, rng),
                ]
            }
            3 => {
                let base = rng.gen_range(0.0..PI);
                (0..3)
                    .map(|i| {
                        let spread = jitter(rng, self.angle_jitter / 2.0);
                        let angle = base + i as f64 * PI / 3.0 + spread;
                        self.diameter(center, radius, angle, rng)
                    })
                    .collect()
            }
            n => {
                let step = TAU / n as f64;
                let base = rng.gen_range(0.0..step);
                (0..n)
                    .map(|i| {
                        let from = base + i as f64 * step + jitter(rng, self.angle_jitter);
                        let to = from + PI + jitter(rng, 0.6);
                        let r1 = radius * rng.gen_range(0.55..=1.0);
                        let r2 = radius * rng.gen_range(0.55..=1.0);
                        (Point::polar(center, r1, from), Point::polar(center, r2, to))
                    })
                    .collect()
            }
        };

        let mut ropes: Vec<Rope> = placements
            .into_iter()
            .enumerate()
            .map(|(i, (a, b))| {
                let id = RopeId(first_id.saturating_add(i as u32));
                Rope::new(id, area.clamp(a), area.clamp(b), rope_color(i))
            })
            .collect();

        let report = self.ensure_crossing(&mut ropes, &area, rng);
        log::debug!(
            "generated {} ropes with {} crossings ({} perturbation rounds)",
            ropes.len(),
            count_crossings(&ropes),
            report.attempts
        );
        (ropes, report)
    }

    /// Makes sure at least two of `ropes` cross, keeping every endpoint
    /// inside `area`.
    ///
    /// While nothing crosses, every endpoint is nudged by up to
    /// [`PERTURBATION_RATIO`] of its rope's length (never more than
    /// [`MAX_PERTURBATION`]), for at most [`Self::max_attempts`] rounds. If
    /// that fails, ropes 0 and 1 are forced into an X. Fewer than two ropes
    /// are left alone.
    pub fn ensure_crossing<R: Rng + ?Sized>(
        &self,
        ropes: &mut [Rope],
        area: &Bounds,
        rng: &mut R,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();
        if ropes.len() < 2 {
            return report;
        }

        while count_crossings(ropes) == 0 && report.attempts < self.max_attempts {
            perturb(ropes, area, rng);
            report.attempts += 1;
        }

        if count_crossings(ropes) == 0 {
            force_crossing(ropes, area);
            report.used_fallback = true;
            log::debug!(
                "no crossing after {} attempts, forced {} and {} into an X",
                report.attempts,
                ropes[0].id(),
                ropes[1].id()
            );
        }
        report
    }

    /// Endpoints on opposite rays from `center`, so the rope passes through
    /// it. Only the radii are jittered.
    fn diameter<R: Rng + ?Sized>(
        &self,
        center: Point,
        radius: f64,
        angle: f64,
        rng: &mut R,
    ) -> (Point, Point) {
        let r1 = radius * (1.0 - rng.gen_range(0.0..=self.radius_jitter.clamp(0.0, 0.9)));
        let r2 = radius * (1.0 - rng.gen_range(0.0..=self.radius_jitter.clamp(0.0, 0.9)));
        (
            Point::polar(center, r1, angle),
            Point::polar(center, r2, angle + PI),
        )
    }
}

/// Generates a layout with the default tuning.
pub fn generate<R: Rng + ?Sized>(rope_count: usize, bounds: &Bounds, rng: &mut R) -> Vec<Rope> {
    LayoutGenerator::default().generate(rope_count, bounds, rng)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f64) -> f64 {
    if amount > 0.0 {
        rng.gen_range(-amount..=amount)
    } else {
        0.0
    }
}

/// Moves every endpoint by up to 10% of its rope's length (at most 25 units)
/// in a random direction, then clamps it back into `area`.
fn perturb<R: Rng + ?Sized>(ropes: &mut [Rope], area: &Bounds, rng: &mut R) {
    for rope in ropes.iter_mut() {
        let reach = (rope.length() * PERTURBATION_RATIO).min(MAX_PERTURBATION);
        for which in [RopeEnd::Start, RopeEnd::End] {
            let angle = rng.gen_range(0.0..TAU);
            let distance = if reach > 0.0 {
                rng.gen_range(0.0..=reach)
            } else {
                0.0
            };
            let moved = Point::polar(rope.endpoint(which), distance, angle);
            rope.set_endpoint(which, area.clamp(moved));
        }
    }
}

/// Overrides the first two ropes with an X through the center of `area`.
///
/// Only ropes 0 and 1 move; with more ropes the rest keep their positions.
pub(crate) fn force_crossing(ropes: &mut [Rope], area: &Bounds) {
    if ropes.len() < 2 {
        return;
    }
    let center = area.center();
    let d = area.width().min(area.height()) / 4.0;

    ropes[0].set_endpoint(RopeEnd::Start, area.clamp(center.offset(-d, -d)));
    ropes[0].set_endpoint(RopeEnd::End, area.clamp(center.offset(d, d)));
    ropes[1].set_endpoint(RopeEnd::Start, area.clamp(center.offset(-d, d)));
    ropes[1].set_endpoint(RopeEnd::End, area.clamp(center.offset(d, -d)));
}
