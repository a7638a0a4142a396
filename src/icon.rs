//! Pixel geometry for a single padded icon rendition.
//!
//! An icon canvas is a square of `edge_length` pixels. A transparent margin of
//! `padding_px` pixels surrounds a square content area, and the content is
//! clipped to a rounded rectangle whose corner radius scales with the content
//! edge, not the canvas.

use crate::error::{IconsetError, Result};

/// Corner radius as a fraction of the content edge.
pub const CORNER_RADIUS_RATIO: f32 = 0.2;

/// Upper bound (exclusive) for padding percent. At 50% each margin eats half
/// the canvas and nothing is left to draw.
pub const MAX_PADDING_PERCENT: f64 = 50.0;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a square of `edge` pixels inset by `inset` on every side.
    pub fn inset_square(inset: u32, edge: u32) -> Self {
        Self::new(inset, inset, edge, edge)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if the pixel at `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Checks that a padding percent is a usable number in `[0, 50)`.
pub fn validate_padding(padding_percent: f64) -> Result<()> {
    if padding_percent.is_finite() && (0.0..MAX_PADDING_PERCENT).contains(&padding_percent) {
        Ok(())
    } else {
        Err(IconsetError::InvalidPadding(padding_percent))
    }
}

/// Resolved layout of one rendition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconGeometry {
    /// Canvas edge length in pixels.
    pub edge_length: u32,
    /// Transparent margin on each side.
    pub padding_px: u32,
    /// Region holding the resized source and the rounded mask.
    pub content: RectPx,
    /// Corner radius of the mask in pixels.
    pub corner_radius: f32,
}

impl IconGeometry {
    /// Computes the layout for an `edge_length` canvas with the given padding.
    ///
    /// Fails when the padding is out of range or leaves no content pixels.
    pub fn new(edge_length: u32, padding_percent: f64) -> Result<Self> {
        validate_padding(padding_percent)?;

        let padding_px = (f64::from(edge_length) * padding_percent / 100.0).round() as u32;
        let content_size = edge_length
            .checked_sub(padding_px.saturating_mul(2))
            .filter(|&size| size > 0)
            .ok_or(IconsetError::ContentTooSmall {
                edge_length,
                padding_percent,
            })?;

        Ok(Self {
            edge_length,
            padding_px,
            content: RectPx::inset_square(padding_px, content_size),
            corner_radius: content_size as f32 * CORNER_RADIUS_RATIO,
        })
    }

    /// Edge length of the content square.
    pub fn content_size(&self) -> u32 {
        self.content.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn rect_px_new() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
        assert!(rect.contains(10, 20));
        assert!(!rect.contains(110, 20));
    }

    #[test]
    fn zero_padding_fills_canvas() {
        let geometry = IconGeometry::new(256, 0.0).unwrap();
        assert_eq!(geometry.padding_px, 0);
        assert_eq!(geometry.content_size(), 256);
        assert_eq!(geometry.content, RectPx::new(0, 0, 256, 256));
        assert!((geometry.corner_radius - 51.2).abs() < 1e-4);
    }

    #[test]
    fn padding_is_rounded_per_side() {
        // 16 * 10 / 100 = 1.6 -> 2
        let geometry = IconGeometry::new(16, 10.0).unwrap();
        assert_eq!(geometry.padding_px, 2);
        assert_eq!(geometry.content_size(), 12);

        // 1024 * 12.5 / 100 = 128
        let geometry = IconGeometry::new(1024, 12.5).unwrap();
        assert_eq!(geometry.padding_px, 128);
        assert_eq!(geometry.content_size(), 768);
        assert!((geometry.corner_radius - 153.6).abs() < 1e-3);
    }

    #[test]
    fn padding_at_half_pixel_rounds_up() {
        // 500 * 0.7 / 100 = 3.5 -> 4
        let geometry = IconGeometry::new(500, 0.7).unwrap();
        assert_eq!(geometry.padding_px, 4);
        assert_eq!(geometry.content_size(), 492);
    }

    #[test]
    fn padding_out_of_range_is_rejected() {
        for bad in [-1.0, 50.0, 75.0, f64::NAN, f64::INFINITY] {
            let err = IconGeometry::new(64, bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "padding {bad}");
        }
    }

    #[test]
    fn padding_that_consumes_small_canvas_is_rejected() {
        // 16 * 49 / 100 = 7.84 -> 8 per side, nothing left
        let err = IconGeometry::new(16, 49.0).unwrap_err();
        assert!(matches!(
            err,
            IconsetError::ContentTooSmall { edge_length: 16, .. }
        ));
        // The same padding still works on a larger canvas.
        assert!(IconGeometry::new(1024, 49.0).is_ok());
    }
}
