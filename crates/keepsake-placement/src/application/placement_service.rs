//! Reject-sampling placement.

use keepsake_core::geometry::{Point, Rect, Size};
use keepsake_core::rng::{DeterministicRng, uniform};

use crate::domain::zones::{Placement, fallback_band};

/// Sampling attempts before falling back to the safe band.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Places one entity inside `viewport`, avoiding `exclusion_zones`.
///
/// Candidates are drawn uniformly from the padded viewport. A candidate is
/// accepted when no zone contains it. After [`MAX_PLACEMENT_ATTEMPTS`]
/// rejections a point in [`fallback_band`] is returned instead, so placement
/// always makes progress.
pub fn place(
    viewport: Size,
    padding: f64,
    exclusion_zones: &[Rect],
    rng: &mut dyn DeterministicRng,
) -> Placement {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Point::new(
            uniform(rng, padding, viewport.width - padding),
            uniform(rng, padding, viewport.height - padding),
        );
        if !exclusion_zones.iter().any(|zone| zone.contains(candidate)) {
            return Placement::Sampled(candidate);
        }
    }

    let band = fallback_band(viewport);
    let point = Point::new(
        uniform(rng, band.x, band.right()),
        uniform(rng, band.y, band.bottom()),
    );
    tracing::debug!(x = point.x, y = point.y, "placement exhausted, using fallback band");
    Placement::Fallback(point)
}

/// Places `count` entities independently.
pub fn place_many(
    count: usize,
    viewport: Size,
    padding: f64,
    exclusion_zones: &[Rect],
    rng: &mut dyn DeterministicRng,
) -> Vec<Placement> {
    (0..count)
        .map(|_| place(viewport, padding, exclusion_zones, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use keepsake_core::rng::SeededRng;
    use keepsake_test_support::{MockRng, SequenceRng};

    use super::*;
    use crate::domain::zones::hunt_exclusion_zones;

    #[test]
    fn test_place_samples_within_padded_viewport() {
        // Arrange
        let mut rng = SequenceRng::new(vec![0.5, 0.25]);

        // Act
        let placement = place(Size::new(1000.0, 600.0), 80.0, &[], &mut rng);

        // Assert
        assert_eq!(placement, Placement::Sampled(Point::new(500.0, 190.0)));
    }

    #[test]
    fn test_place_never_returns_sampled_point_inside_a_zone() {
        let viewport = Size::new(1440.0, 900.0);
        let zones = hunt_exclusion_zones(viewport);
        let mut rng = SeededRng::from_seed(42);

        for _ in 0..500 {
            let placement = place(viewport, 80.0, &zones, &mut rng);
            match placement {
                Placement::Sampled(p) => {
                    assert!(zones.iter().all(|z| !z.contains(p)), "{p:?} inside a zone");
                    assert!(p.x >= 80.0 && p.x < 1360.0);
                    assert!(p.y >= 80.0 && p.y < 820.0);
                }
                Placement::Fallback(p) => {
                    let band = fallback_band(viewport);
                    assert!(p.x >= band.x && p.x <= band.right());
                }
            }
        }
    }

    #[test]
    fn test_place_falls_back_when_everything_is_excluded() {
        // Arrange
        let viewport = Size::new(800.0, 600.0);
        let everything = [Rect::new(-1.0, -1.0, 1000.0, 1000.0)];
        let mut rng = MockRng;

        // Act
        let placement = place(viewport, 80.0, &everything, &mut rng);

        // Assert
        assert!(placement.is_fallback());
        assert_eq!(placement.point(), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_place_accepts_points_on_zone_edges() {
        // The candidate lands exactly on the zone's left edge.
        let zone = Rect::new(500.0, 0.0, 100.0, 600.0);
        let mut rng = SequenceRng::new(vec![0.5]);

        let placement = place(Size::new(1000.0, 600.0), 0.0, &[zone], &mut rng);

        assert_eq!(placement, Placement::Sampled(Point::new(500.0, 300.0)));
    }

    #[test]
    fn test_place_many_returns_requested_count() {
        let mut rng = SeededRng::from_seed(1);
        let placements = place_many(12, Size::new(1200.0, 800.0), 80.0, &[], &mut rng);
        assert_eq!(placements.len(), 12);
    }
}
