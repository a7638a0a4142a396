//! Source image loading for raster and SVG inputs.
//!
//! A source is decoded once per run and then scaled to each content size.
//! Raster formats go through the `image` codecs; SVG documents are parsed
//! with usvg and rasterised by resvg straight at the requested size, so
//! vector art stays crisp at every resolution.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{IconsetError, Result};

/// Resampling filter used for raster sources.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Decoded pixels or parsed vector document.
enum SourceData {
    Raster(DynamicImage),
    Vector(Tree),
}

/// A decoded source image, reusable across every rendition of a run.
pub struct SourceImage {
    path: PathBuf,
    data: SourceData,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("path", &self.path)
            .field("vector", &self.is_vector())
            .finish()
    }
}

impl SourceImage {
    /// Opens and decodes the file at `path`.
    ///
    /// Files with an `.svg` extension are parsed as SVG; everything else is
    /// handed to the raster codecs, which sniff the actual format from the
    /// file contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = if is_svg_path(path) {
            let bytes = fs::read(path).map_err(|e| IconsetError::decode(path, e))?;
            SourceData::Vector(parse_svg(path, &bytes)?)
        } else {
            let image = ImageReader::open(path)
                .and_then(|reader| reader.with_guessed_format())
                .map_err(|e| IconsetError::decode(path, e))?
                .decode()
                .map_err(|e| IconsetError::decode(path, e))?;
            SourceData::Raster(image)
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Wraps an already decoded raster image.
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            data: SourceData::Raster(image),
        }
    }

    /// Parses SVG markup held in memory.
    pub fn from_svg(path: impl Into<PathBuf>, svg: &str) -> Result<Self> {
        let path = path.into();
        let tree = parse_svg(&path, svg.as_bytes())?;
        Ok(Self {
            path,
            data: SourceData::Vector(tree),
        })
    }

    /// The path this source was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_vector(&self) -> bool {
        matches!(self.data, SourceData::Vector(_))
    }

    /// Scales the source to a `size x size` RGBA image.
    ///
    /// The aspect ratio is not preserved: the whole source is stretched onto
    /// the square, never cropped.
    pub fn scaled_to(&self, size: u32) -> Result<RgbaImage> {
        match &self.data {
            SourceData::Raster(image) => Ok(image.resize_exact(size, size, RESIZE_FILTER).to_rgba8()),
            SourceData::Vector(tree) => self.rasterize(tree, size),
        }
    }

    fn rasterize(&self, tree: &Tree, size: u32) -> Result<RgbaImage> {
        let mut pixmap = Pixmap::new(size, size).ok_or_else(|| IconsetError::Resize {
            path: self.path.clone(),
            edge_length: size,
            reason: "cannot allocate pixmap".into(),
        })?;

        let svg_size = tree.size();
        let transform = Transform::from_scale(
            size as f32 / svg_size.width(),
            size as f32 / svg_size.height(),
        );
        resvg::render(tree, transform, &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

/// Returns true when the path carries an `.svg` extension (any case).
pub fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

fn parse_svg(path: &Path, data: &[u8]) -> Result<Tree> {
    let opts = Options::default();
    Tree::from_data(data, &opts).map_err(|e| IconsetError::decode(path, e))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    // tiny_skia stores premultiplied alpha
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}
