//! Rendering of single icon renditions.
//!
//! Each rendition goes through the same fixed pipeline:
//!
//! ```text
//! source ──► scale to content square ──► pad to canvas ──► rounded mask (dst-in) ──► PNG
//! ```
//!
//! The geometry is validated before the source is touched, so a bad padding
//! value never costs a decode.

pub mod mask;
pub mod source;

pub use source::SourceImage;

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, RgbaImage};

use crate::error::{IconsetError, Result};
use crate::icon::IconGeometry;

/// Everything needed to render one rendition from a file.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub source_path: PathBuf,
    pub edge_length: u32,
    /// Transparent margin per side, as a percent of the canvas edge, in `[0, 50)`.
    pub padding_percent: f64,
}

impl RenderConfig {
    pub fn new(source_path: impl Into<PathBuf>, edge_length: u32, padding_percent: f64) -> Self {
        Self {
            source_path: source_path.into(),
            edge_length,
            padding_percent,
        }
    }

    /// Resolves the canvas layout, failing on unusable padding.
    pub fn geometry(&self) -> Result<IconGeometry> {
        IconGeometry::new(self.edge_length, self.padding_percent)
    }
}

/// Renders `source` into a padded, rounded `edge_length` square.
pub fn render_icon(source: &SourceImage, edge_length: u32, padding_percent: f64) -> Result<RgbaImage> {
    let geometry = IconGeometry::new(edge_length, padding_percent)?;
    render_with_geometry(source, &geometry)
}

/// Renders `source` using an already resolved layout.
pub fn render_with_geometry(source: &SourceImage, geometry: &IconGeometry) -> Result<RgbaImage> {
    let content = source.scaled_to(geometry.content_size())?;
    let mut canvas = mask::pad_to_canvas(&content, geometry);

    let mask = mask::rounded_mask(geometry).ok_or_else(|| IconsetError::Resize {
        path: source.path().to_path_buf(),
        edge_length: geometry.edge_length,
        reason: "cannot build corner mask".into(),
    })?;
    mask::destination_in(&mut canvas, &mask);

    Ok(canvas)
}

/// Decodes the configured source, renders it and encodes the result as PNG.
pub fn render_file(config: &RenderConfig) -> Result<Vec<u8>> {
    let geometry = config.geometry()?;
    let source = SourceImage::open(&config.source_path)?;
    let image = render_with_geometry(&source, &geometry)?;
    encode_png(&image)
}

/// Encodes an RGBA image as PNG bytes.
///
/// The encoder writes no timestamps, so identical pixels give identical bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
