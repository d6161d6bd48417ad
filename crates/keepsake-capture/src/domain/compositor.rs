//! Strip compositing.
//!
//! Compositing is a pure function of the shots, the optional frame overlay
//! and the layout: the canvas is rebuilt from scratch every time.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use keepsake_core::error::DomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A pixel rectangle on the canvas or in a source frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Canvas size, background and photo slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripLayout {
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
    /// Canvas fill behind the photos.
    pub background: [u8; 4],
    /// One slot per shot, in shot order.
    pub slots: Vec<PixelRect>,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 1800,
            background: [255, 255, 255, 255],
            slots: vec![
                PixelRect::new(0, 10, 600, 520),
                PixelRect::new(0, 510, 600, 520),
                PixelRect::new(0, 1010, 600, 520),
            ],
        }
    }
}

impl StripLayout {
    /// Checks that every slot is non-empty and inside the canvas.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` describing the first bad slot.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.slots.is_empty() {
            return Err(DomainError::Configuration(
                "strip layout needs at least one slot".to_owned(),
            ));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            let fits = slot.width > 0
                && slot.height > 0
                && u64::from(slot.x) + u64::from(slot.width) <= u64::from(self.canvas_width)
                && u64::from(slot.y) + u64::from(slot.height) <= u64::from(self.canvas_height);
            if !fits {
                return Err(DomainError::Configuration(format!(
                    "slot {i} does not fit a {}x{} canvas",
                    self.canvas_width, self.canvas_height
                )));
            }
        }
        Ok(())
    }
}

/// A finished strip and the SHA-256 of its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// The rendered strip.
    pub image: RgbaImage,
    /// Hex digest over dimensions and raw RGBA bytes.
    pub fingerprint: String,
}

impl Composite {
    fn new(image: RgbaImage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(image.width().to_le_bytes());
        hasher.update(image.height().to_le_bytes());
        hasher.update(image.as_raw());
        let fingerprint = hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        Self { image, fingerprint }
    }
}

/// The source region that fills a `target_width`×`target_height` slot
/// without distortion.
///
/// A source wider than the slot loses its sides; otherwise it loses its
/// top and bottom. The kept region is always centred.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn cover_crop(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> PixelRect {
    let (sw, sh) = (f64::from(source_width), f64::from(source_height));
    let target_aspect = f64::from(target_width) / f64::from(target_height.max(1));

    if sw / sh.max(1.0) > target_aspect {
        let width = ((sh * target_aspect).round() as u32).clamp(1, source_width);
        PixelRect::new((source_width - width) / 2, 0, width, source_height)
    } else {
        let height = ((sw / target_aspect).round() as u32).clamp(1, source_height);
        PixelRect::new(0, (source_height - height) / 2, source_width, height)
    }
}

/// Renders `shots` into `layout`, then lays `overlay` over the whole canvas.
///
/// Extra shots beyond the slot count are ignored. An overlay of the wrong
/// size is stretched to the canvas.
#[must_use]
pub fn compose_strip(
    shots: &[RgbaImage],
    overlay: Option<&RgbaImage>,
    layout: &StripLayout,
) -> Composite {
    let mut canvas = RgbaImage::from_pixel(
        layout.canvas_width,
        layout.canvas_height,
        Rgba(layout.background),
    );

    for (shot, slot) in shots.iter().zip(&layout.slots) {
        let crop = cover_crop(shot.width(), shot.height(), slot.width, slot.height);
        let region = imageops::crop_imm(shot, crop.x, crop.y, crop.width, crop.height).to_image();
        let scaled = imageops::resize(&region, slot.width, slot.height, FilterType::Triangle);
        imageops::replace(&mut canvas, &scaled, i64::from(slot.x), i64::from(slot.y));
    }

    if let Some(frame) = overlay {
        if frame.dimensions() == canvas.dimensions() {
            imageops::overlay(&mut canvas, frame, 0, 0);
        } else {
            let stretched = imageops::resize(
                frame,
                layout.canvas_width,
                layout.canvas_height,
                FilterType::Triangle,
            );
            imageops::overlay(&mut canvas, &stretched, 0, 0);
        }
    }

    Composite::new(canvas)
}

#[cfg(test)]
mod tests {
    use keepsake_test_support::solid_frame;

    use super::*;

    #[test]
    fn test_wide_source_into_square_slot_crops_width_centred() {
        let crop = cover_crop(200, 100, 50, 50);

        assert_eq!(crop, PixelRect::new(50, 0, 100, 100));
    }

    #[test]
    fn test_tall_source_crops_height_centred() {
        let crop = cover_crop(100, 300, 100, 100);

        assert_eq!(crop, PixelRect::new(0, 100, 100, 100));
    }

    #[test]
    fn test_capture_frame_into_strip_slot_crops_width() {
        // 1280x720 is wider than 600x520.
        let crop = cover_crop(1280, 720, 600, 520);

        assert_eq!(crop.height, 720);
        assert_eq!(crop.width, 831);
        assert_eq!(crop.x, (1280 - 831) / 2);
    }

    #[test]
    fn test_compose_places_shots_in_slots_on_white() {
        // Arrange
        let layout = StripLayout::default();
        let red = solid_frame(1280, 720, [255, 0, 0, 255]);
        let green = solid_frame(1280, 720, [0, 255, 0, 255]);

        // Act
        let composite = compose_strip(&[red, green], None, &layout);

        // Assert
        let image = &composite.image;
        assert_eq!(image.dimensions(), (600, 1800));
        assert_eq!(image.get_pixel(300, 5), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(300, 200), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(300, 800), &Rgba([0, 255, 0, 255]));
        assert_eq!(image.get_pixel(300, 1500), &Rgba([255, 255, 255, 255]));
        assert_eq!(composite.fingerprint.len(), 64);
    }

    #[test]
    fn test_overlay_is_blended_over_everything() {
        let layout = StripLayout::default();
        let shot = solid_frame(1280, 720, [255, 0, 0, 255]);
        let mut frame = solid_frame(600, 1800, [0, 0, 0, 0]);
        frame.put_pixel(300, 200, Rgba([0, 0, 255, 255]));

        let composite = compose_strip(&[shot], Some(&frame), &layout);

        assert_eq!(composite.image.get_pixel(300, 200), &Rgba([0, 0, 255, 255]));
        assert_eq!(composite.image.get_pixel(301, 200), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_composite_is_deterministic() {
        let layout = StripLayout::default();
        let shots = vec![
            solid_frame(1280, 720, [1, 2, 3, 255]),
            solid_frame(1280, 720, [4, 5, 6, 255]),
            solid_frame(1280, 720, [7, 8, 9, 255]),
        ];

        let a = compose_strip(&shots, None, &layout);
        let b = compose_strip(&shots, None, &layout);

        assert_eq!(a.image.as_raw(), b.image.as_raw());
        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn test_layout_rejects_slot_outside_canvas() {
        let layout = StripLayout {
            slots: vec![PixelRect::new(0, 1700, 600, 520)],
            ..StripLayout::default()
        };

        assert!(matches!(layout.validate(), Err(DomainError::Configuration(_))));
        assert!(StripLayout::default().validate().is_ok());
    }
}
