//! Rounded-rectangle masking.
//!
//! The mask is an anti-aliased coverage map drawn with tiny_skia. It is
//! applied with a destination-in rule: each destination pixel keeps its color
//! but its alpha is multiplied by the mask coverage, so everything outside the
//! rounded rectangle becomes fully transparent.

use image::{Rgba, RgbaImage, imageops};
use resvg::tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};

use crate::icon::{IconGeometry, RectPx};

/// Distance of cubic control points from the arc ends, as a fraction of the
/// radius, for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Builds a closed rounded-rectangle path.
///
/// The radius is clamped to half the shorter side. Returns `None` for an
/// empty rectangle.
pub fn rounded_rect_path(rect: RectPx, radius: f32) -> Option<Path> {
    if rect.width == 0 || rect.height == 0 {
        return None;
    }

    let (x, y) = (rect.x as f32, rect.y as f32);
    let (w, h) = (rect.width as f32, rect.height as f32);
    let r = radius.max(0.0).min(w / 2.0).min(h / 2.0);
    let c = r * (1.0 - KAPPA);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - c, y, x + w, y + c, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - c, x + w - c, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + c, y + h, x, y + h - c, x, y + h - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + c, x + c, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Draws the content mask for a rendition on a canvas-sized coverage map.
pub fn rounded_mask(geometry: &IconGeometry) -> Option<Mask> {
    let path = rounded_rect_path(geometry.content, geometry.corner_radius)?;
    let mut mask = Mask::new(geometry.edge_length, geometry.edge_length)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

/// Places `content` on a transparent canvas at the geometry's content offset.
pub fn pad_to_canvas(content: &RgbaImage, geometry: &IconGeometry) -> RgbaImage {
    let mut canvas = RgbaImage::new(geometry.edge_length, geometry.edge_length);
    // replace, not overlay: source alpha is copied as-is
    imageops::replace(
        &mut canvas,
        content,
        i64::from(geometry.content.x),
        i64::from(geometry.content.y),
    );
    canvas
}

/// Keeps destination pixels only where the mask is opaque.
///
/// Alpha becomes `round(alpha * coverage / 255)`. Pixels that end up fully
/// transparent are cleared to `[0, 0, 0, 0]`.
pub fn destination_in(dest: &mut RgbaImage, mask: &Mask) {
    debug_assert_eq!(dest.width(), mask.width());
    debug_assert_eq!(dest.height(), mask.height());

    for (pixel, &coverage) in dest.pixels_mut().zip(mask.data()) {
        let alpha = (u16::from(pixel[3]) * u16::from(coverage) + 127) / 255;
        *pixel = if alpha == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([pixel[0], pixel[1], pixel[2], alpha as u8])
        };
    }
}
