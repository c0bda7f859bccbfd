//! Scatter placement with a minimum-distance constraint
//!
//! Each entity gets up to `retry_budget` uniformly random candidates inside the
//! band. The first candidate far enough from every earlier placement wins. If
//! none qualifies the last candidate is kept anyway, so placement always
//! terminates at the cost of possibly violating the spacing for that entity.

use glam::Vec2;
use rand::Rng;

use crate::error::{Axis, SceneIssue};
use crate::tuning::PlacementTuning;
use crate::{distance, random_between};

/// Axis-aligned sampling band, always at least one unit wide on both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Upper bound kept at least one unit above `lower`
#[inline]
pub fn clamp_upper(lower: f32, upper: f32) -> f32 {
    upper.max(lower + 1.0)
}

impl Band {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x: clamp_upper(min_x, max_x),
            min_y,
            max_y: clamp_upper(min_y, max_y),
        }
    }

    /// Band below the waterline for a viewport, plus any clamping it needed
    pub fn for_viewport(
        viewport: Vec2,
        waterline_y: f32,
        tuning: &PlacementTuning,
    ) -> (Self, Vec<SceneIssue>) {
        let padding = tuning.padding_cap.min(viewport.x * tuning.padding_ratio);
        let min_x = padding;
        let max_x = viewport.x - padding;
        let min_y = waterline_y + tuning.band_top_offset;
        let max_y = (waterline_y + tuning.band_min_depth).max(viewport.y - tuning.band_bottom_margin);

        let mut issues = Vec::new();
        if max_x < min_x + 1.0 {
            issues.push(SceneIssue::DegenerateBand {
                axis: Axis::Horizontal,
                lower: min_x,
                upper: max_x,
            });
        }
        if max_y < min_y + 1.0 {
            issues.push(SceneIssue::DegenerateBand {
                axis: Axis::Vertical,
                lower: min_y,
                upper: max_y,
            });
        }

        (Self::new(min_x, max_x, min_y, max_y), issues)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            random_between(rng, self.min_x, self.max_x),
            random_between(rng, self.min_y, self.max_y),
        )
    }

    /// Random Y inside the band (swimmer respawn)
    pub fn sample_y<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        random_between(rng, self.min_y, self.max_y)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }
}

/// One batch of placements
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest {
    pub count: usize,
    pub band: Band,
    pub min_distance: f32,
    /// Candidates tried per entity; zero is treated as one
    pub retry_budget: u32,
}

impl PlacementRequest {
    pub fn new(count: usize, band: Band, tuning: &PlacementTuning) -> Self {
        Self {
            count,
            band,
            min_distance: tuning.min_distance,
            retry_budget: tuning.retry_budget,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Met the minimum distance on the given attempt (1-based)
    Accepted { attempt: u32 },
    /// Budget exhausted; last candidate kept without the distance guarantee
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub pos: Vec2,
    pub outcome: PlacementOutcome,
}

impl Placement {
    pub fn is_fallback(&self) -> bool {
        self.outcome == PlacementOutcome::Fallback
    }
}

/// Place `request.count` points; output order matches entity order
pub fn scatter<R: Rng + ?Sized>(request: &PlacementRequest, rng: &mut R) -> Vec<Placement> {
    let attempts = request.retry_budget.max(1);
    let mut placed: Vec<Placement> = Vec::with_capacity(request.count);

    for _ in 0..request.count {
        let mut candidate = request.band.sample(rng);
        let mut outcome = PlacementOutcome::Fallback;

        for attempt in 1..=attempts {
            if attempt > 1 {
                candidate = request.band.sample(rng);
            }
            let clear = placed
                .iter()
                .all(|p| distance(p.pos, candidate) >= request.min_distance);
            if clear {
                outcome = PlacementOutcome::Accepted { attempt };
                break;
            }
        }

        placed.push(Placement {
            pos: candidate,
            outcome,
        });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn request(count: usize, band: Band, min_distance: f32, retry_budget: u32) -> PlacementRequest {
        PlacementRequest {
            count,
            band,
            min_distance,
            retry_budget,
        }
    }

    fn all_pairs_apart(placements: &[Placement], min_distance: f32) -> bool {
        placements.iter().enumerate().all(|(i, a)| {
            placements[i + 1..]
                .iter()
                .all(|b| distance(a.pos, b.pos) >= min_distance)
        })
    }

    #[test]
    fn test_zero_entities() {
        let mut rng = Pcg32::seed_from_u64(1);
        let band = Band::new(0.0, 100.0, 0.0, 100.0);
        assert!(scatter(&request(0, band, 10.0, 24), &mut rng).is_empty());
    }

    #[test]
    fn test_generous_band_keeps_spacing() {
        let mut rng = Pcg32::seed_from_u64(42);
        let band = Band::new(0.0, 4000.0, 0.0, 4000.0);
        let placements = scatter(&request(6, band, 160.0, 24), &mut rng);
        assert_eq!(placements.len(), 6);
        assert!(placements.iter().all(|p| !p.is_fallback()));
        assert!(all_pairs_apart(&placements, 160.0));
        assert!(placements.iter().all(|p| band.contains(p.pos)));
    }

    #[test]
    fn test_first_entity_accepted_on_first_attempt() {
        let mut rng = Pcg32::seed_from_u64(3);
        let band = Band::new(0.0, 10.0, 0.0, 10.0);
        let placements = scatter(&request(1, band, 1000.0, 24), &mut rng);
        assert_eq!(placements[0].outcome, PlacementOutcome::Accepted { attempt: 1 });
    }

    #[test]
    fn test_exhausted_budget_falls_back_inside_band() {
        let mut rng = Pcg32::seed_from_u64(9);
        // Spacing larger than the band diagonal can never be met twice
        let band = Band::new(0.0, 10.0, 0.0, 10.0);
        let placements = scatter(&request(4, band, 100.0, 24), &mut rng);
        assert_eq!(placements.len(), 4);
        assert!(!placements[0].is_fallback());
        assert!(placements[1..].iter().all(|p| p.is_fallback()));
        assert!(placements.iter().all(|p| band.contains(p.pos)));
    }

    #[test]
    fn test_zero_budget_still_places() {
        let mut rng = Pcg32::seed_from_u64(5);
        let band = Band::new(0.0, 100.0, 0.0, 100.0);
        let placements = scatter(&request(3, band, 0.0, 0), &mut rng);
        assert_eq!(placements.len(), 3);
        assert!(placements.iter().all(|p| !p.is_fallback()));
    }

    #[test]
    fn test_degenerate_viewport_band_is_clamped() {
        let tuning = PlacementTuning::default();
        let (band, issues) = Band::for_viewport(Vec2::new(0.0, 600.0), 210.0, &tuning);
        assert!(band.max_x >= band.min_x + 1.0);
        assert!(matches!(
            issues.as_slice(),
            [SceneIssue::DegenerateBand {
                axis: Axis::Horizontal,
                ..
            }]
        ));
    }

    #[test]
    fn test_viewport_band_bounds() {
        let tuning = PlacementTuning::default();
        let (band, issues) = Band::for_viewport(Vec2::new(1000.0, 800.0), 210.0, &tuning);
        assert!(issues.is_empty());
        assert_eq!(band.min_x, 120.0);
        assert_eq!(band.max_x, 880.0);
        assert_eq!(band.min_y, 280.0);
        assert_eq!(band.max_y, 660.0);

        // Short viewport: bottom never rises above waterline + min depth
        let (band, _) = Band::for_viewport(Vec2::new(1000.0, 300.0), 210.0, &tuning);
        assert_eq!(band.max_y, 310.0);
    }

    #[test]
    fn test_five_entities_in_reference_viewport() {
        // 1000x600 viewport, 70..460 vertical band
        let band = Band::new(120.0, 880.0, 70.0, 460.0);
        let mut fully_spaced = 0;
        for seed in 0..100u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let placements = scatter(&request(5, band, 160.0, 200), &mut rng);
            assert_eq!(placements.len(), 5);
            assert!(placements.iter().all(|p| band.contains(p.pos)));
            if all_pairs_apart(&placements, 160.0) {
                fully_spaced += 1;
            }
        }
        assert!(fully_spaced >= 90, "only {fully_spaced}/100 seeds fully spaced");
    }

    proptest! {
        #[test]
        fn prop_band_never_inverts(
            lower_x in -1000.0f32..1000.0,
            upper_x in -1000.0f32..1000.0,
            lower_y in -1000.0f32..1000.0,
            upper_y in -1000.0f32..1000.0,
        ) {
            let band = Band::new(lower_x, upper_x, lower_y, upper_y);
            prop_assert!(band.max_x >= band.min_x + 1.0);
            prop_assert!(band.max_y >= band.min_y + 1.0);
        }

        #[test]
        fn prop_scatter_returns_count_inside_band(count in 0usize..16, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let band = Band::new(0.0, 500.0, 0.0, 300.0);
            let placements = scatter(&request(count, band, 80.0, 24), &mut rng);
            prop_assert_eq!(placements.len(), count);
            prop_assert!(placements.iter().all(|p| band.contains(p.pos)));
        }
    }
}
