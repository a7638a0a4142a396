//! iconset-forge: build macOS `.icns` icons from a single source image
//!
//! The crate renders one raster or SVG source into every size a macOS
//! iconset needs, with a transparent margin and rounded corners, stages the
//! PNGs in an `.iconset` directory and hands that directory to the system
//! icon compiler.
//!
//! # Example
//!
//! ```
//! use iconset_forge::{render_icon, iconset_sizes, SourceImage};
//! use image::{DynamicImage, Rgba, RgbaImage};
//!
//! let art = RgbaImage::from_pixel(64, 64, Rgba([30, 144, 255, 255]));
//! let source = SourceImage::from_image("art.png", DynamicImage::ImageRgba8(art));
//!
//! for spec in iconset_sizes().iter().take(2) {
//!     let image = render_icon(&source, spec.edge_length, 10.0).unwrap();
//!     assert_eq!(image.width(), spec.edge_length);
//! }
//! ```
//!
//! # Full runs
//!
//! [`IconsetAssembler`] validates the input, resets the staging directory,
//! renders every [`SizeSpec`], packages through an [`IconsetPackager`] and
//! finally exports unprefixed copies of the images:
//!
//! ```text
//! <outputDir>/icon.iconset/icon_16x16.png ... icon_1024x1024@2x.png
//! <outputDir>/icon.icns
//! <outputDir>/icons/16x16.png ... 1024x1024@2x.png
//! ```

mod assembler;
mod error;
mod icon;
mod options;
mod packager;
mod render;
mod size;

pub use assembler::{
    GenerationReport, ICON_PREFIX, IconsetAssembler, StagedFile, StagedIconset, plain_file_name,
    reset_directory,
};
pub use error::{ErrorKind, IconsetError, Result};
pub use icon::{CORNER_RADIUS_RATIO, IconGeometry, MAX_PADDING_PERCENT, RectPx, validate_padding};
pub use options::{GenerationOptions, GenerationOverrides, SUPPORTED_FORMATS, supported_formats};
pub use packager::{IconsetPackager, Iconutil};
pub use render::{
    RenderConfig, SourceImage, encode_png, render_file, render_icon, render_with_geometry,
};
pub use size::{BASE_EDGE_LENGTHS, Density, SizeSpec, iconset_sizes, plan_sizes};
