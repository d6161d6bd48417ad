//! Exclusion zones and the fallback band.

use keepsake_core::geometry::{Point, Rect, Size};

/// Width of the right-hand column occupied by the side cards.
const SIDE_COLUMN_WIDTH: f64 = 300.0;
/// Half the height of the counter card band around the vertical centre.
const COUNTER_CARD_HALF_HEIGHT: f64 = 150.0;
/// Height of the mission prompt band at the bottom of the side column.
const MISSION_PROMPT_HEIGHT: f64 = 250.0;
/// Half extents of the centre card, margin included.
const CENTER_CARD_HALF_WIDTH: f64 = 320.0;
const CENTER_CARD_HALF_HEIGHT: f64 = 280.0;

/// Left inset of the fallback band.
const FALLBACK_LEFT: f64 = 50.0;
/// Share of the viewport width the fallback band spans.
const FALLBACK_WIDTH_SHARE: f64 = 0.25;
/// Vertical inset of the fallback band, top and bottom.
const FALLBACK_VERTICAL_INSET: f64 = 100.0;

/// Outcome of a placement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A uniformly sampled point outside every exclusion zone.
    Sampled(Point),
    /// A point from the fallback band after sampling was exhausted.
    Fallback(Point),
}

impl Placement {
    /// The placed point, regardless of how it was produced.
    #[must_use]
    pub fn point(self) -> Point {
        match self {
            Self::Sampled(p) | Self::Fallback(p) => p,
        }
    }

    /// Whether the fallback band was used.
    #[must_use]
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// The left-hand band used when sampling cannot find a free spot.
///
/// Spans `[50, 50 + w/4)` horizontally and `[100, h - 100)` vertically.
#[must_use]
pub fn fallback_band(viewport: Size) -> Rect {
    Rect::from_edges(
        FALLBACK_LEFT,
        FALLBACK_VERTICAL_INSET,
        FALLBACK_LEFT + viewport.width * FALLBACK_WIDTH_SHARE,
        (viewport.height - FALLBACK_VERTICAL_INSET).max(FALLBACK_VERTICAL_INSET),
    )
}

/// Zones the collection hunt keeps free: the counter card, the mission
/// prompt, and the centre card.
#[must_use]
pub fn hunt_exclusion_zones(viewport: Size) -> Vec<Rect> {
    let w = viewport.width;
    let h = viewport.height;
    let cx = w / 2.0;
    let cy = h / 2.0;
    let unbounded = f64::MAX / 4.0;

    vec![
        // Counter card: right column, vertically centred.
        Rect::from_edges(
            w - SIDE_COLUMN_WIDTH,
            cy - COUNTER_CARD_HALF_HEIGHT,
            unbounded,
            cy + COUNTER_CARD_HALF_HEIGHT,
        ),
        // Mission prompt: bottom of the right column.
        Rect::from_edges(
            w - SIDE_COLUMN_WIDTH,
            h - MISSION_PROMPT_HEIGHT,
            unbounded,
            unbounded,
        ),
        Rect::from_edges(
            cx - CENTER_CARD_HALF_WIDTH,
            cy - CENTER_CARD_HALF_HEIGHT,
            cx + CENTER_CARD_HALF_WIDTH,
            cy + CENTER_CARD_HALF_HEIGHT,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunt_zones_cover_centre_card() {
        let zones = hunt_exclusion_zones(Size::new(1440.0, 900.0));

        assert_eq!(zones.len(), 3);
        assert!(zones[2].contains(Point::new(720.0, 450.0)));
        assert!(!zones[2].contains(Point::new(300.0, 450.0)));
    }

    #[test]
    fn test_side_zones_extend_past_right_edge() {
        let zones = hunt_exclusion_zones(Size::new(1440.0, 900.0));

        assert!(zones[0].contains(Point::new(1400.0, 450.0)));
        assert!(zones[1].contains(Point::new(1400.0, 880.0)));
        assert!(!zones[0].contains(Point::new(1100.0, 450.0)));
    }

    #[test]
    fn test_fallback_band_is_left_quarter() {
        let band = fallback_band(Size::new(1200.0, 800.0));

        assert!((band.x - 50.0).abs() < f64::EPSILON);
        assert!((band.right() - 350.0).abs() < f64::EPSILON);
        assert!((band.y - 100.0).abs() < f64::EPSILON);
        assert!((band.bottom() - 700.0).abs() < f64::EPSILON);
    }
}
