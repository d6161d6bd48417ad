//! Canonical solved layout.

use keepsake_core::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// Where a tile should end up once the puzzle is solved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileAnimationIntent {
    /// The tile to move.
    pub tile_id: u32,
    /// Target top-left position.
    pub target: Point,
    /// Target rotation in degrees.
    pub rotation: f64,
    /// Target scale.
    pub scale: f64,
}

/// Lays tiles out in one centred row, overlapping by `overlap_factor`.
///
/// Spacing is `tile.width * overlap_factor`; the row spans
/// `(n - 1) * spacing + tile.width` and is centred in the viewport on both
/// axes. `order` lists tile ids in reading order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn canonical_layout(
    order: &[u32],
    tile: Size,
    viewport: Size,
    overlap_factor: f64,
    scale: f64,
) -> Vec<TileAnimationIntent> {
    let Some(last) = order.len().checked_sub(1) else {
        return Vec::new();
    };
    let spacing = tile.width * overlap_factor;
    let row_width = last as f64 * spacing + tile.width;
    let start_x = (viewport.width - row_width) / 2.0;
    let start_y = (viewport.height - tile.height) / 2.0;

    order
        .iter()
        .enumerate()
        .map(|(i, &tile_id)| TileAnimationIntent {
            tile_id,
            target: Point::new(start_x + i as f64 * spacing, start_y),
            rotation: 0.0,
            scale,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_layout_centres_overlapping_row() {
        // 9 tiles of 100 wide: spacing 45, row 8 * 45 + 100 = 460.
        let order: Vec<u32> = (0..9).collect();

        let intents = canonical_layout(
            &order,
            Size::new(100.0, 120.0),
            Size::new(1000.0, 800.0),
            0.45,
            1.2,
        );

        assert_eq!(intents.len(), 9);
        assert_eq!(intents[0].target, Point::new(270.0, 340.0));
        assert!((intents[8].target.x - (270.0 + 8.0 * 45.0)).abs() < 1e-9);
        assert!(intents.iter().all(|i| i.rotation.abs() < 1e-9 && (i.scale - 1.2).abs() < 1e-9));
    }

    #[test]
    fn test_canonical_layout_of_nothing_is_empty() {
        let intents = canonical_layout(&[], Size::new(1.0, 1.0), Size::new(1.0, 1.0), 0.45, 1.0);
        assert!(intents.is_empty());
    }
}
