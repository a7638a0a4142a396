//! Size planning for the iconset.
//!
//! macOS expects every nominal icon size in two renditions: a standard
//! density image at the nominal pixel count and an `@2x` image at twice that.

use std::fmt;

/// Nominal edge lengths required by the `.icns` format, in ascending order.
pub const BASE_EDGE_LENGTHS: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Pixel density of a planned rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Density {
    /// @1x
    Standard,
    /// @2x
    Double,
}

impl Density {
    /// Multiplier applied to the nominal edge length.
    pub fn scale(self) -> u32 {
        match self {
            Self::Standard => 1,
            Self::Double => 2,
        }
    }
}

/// One image the iconset must contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeSpec {
    /// File name inside the iconset directory, e.g. `icon_32x32@2x.png`.
    pub name: String,
    /// Pixel edge length of the rendered square.
    pub edge_length: u32,
    /// Nominal (logical) edge length the name refers to.
    pub base: u32,
    pub density: Density,
}

impl SizeSpec {
    /// Builds the spec for a nominal size at the given density.
    pub fn new(base: u32, density: Density) -> Self {
        let name = match density {
            Density::Standard => format!("icon_{base}x{base}.png"),
            Density::Double => format!("icon_{base}x{base}@2x.png"),
        };
        Self {
            name,
            edge_length: base * density.scale(),
            base,
            density,
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}px)", self.name, self.edge_length)
    }
}

/// Expands base edge lengths into every rendition the iconset needs.
///
/// Output keeps the order of `bases`, standard density before `@2x`.
pub fn plan_sizes(bases: &[u32]) -> Vec<SizeSpec> {
    bases
        .iter()
        .flat_map(|&base| {
            [
                SizeSpec::new(base, Density::Standard),
                SizeSpec::new(base, Density::Double),
            ]
        })
        .collect()
}

/// The full canonical plan for a macOS iconset (14 images).
pub fn iconset_sizes() -> Vec<SizeSpec> {
    plan_sizes(&BASE_EDGE_LENGTHS)
}
