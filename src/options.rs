//! Generation options and their overrides.
//!
//! [`GenerationOptions`] is the complete configuration of a run. It is always
//! built fresh from [`Default`] and then overlaid with a
//! [`GenerationOverrides`], field by field: any field the caller sets wins,
//! every other field keeps its default.
//!
//! # Example
//!
//! ```
//! use iconset_forge::{GenerationOptions, GenerationOverrides};
//!
//! let overrides = GenerationOverrides::from_json(r#"{ "input": "logo.svg", "paddingPercent": 8 }"#).unwrap();
//! let options = GenerationOptions::from_overrides(overrides);
//!
//! assert_eq!(options.input.to_str(), Some("logo.svg"));
//! assert_eq!(options.padding_percent, 8.0);
//! assert_eq!(options.output.to_str(), Some("icon.icns"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IconsetError, IoContext, Result};
use crate::icon::validate_padding;

/// Input extensions accepted by default, lowercase, without the dot.
pub const SUPPORTED_FORMATS: [&str; 10] = [
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "tif", "ico", "svg",
];

/// Returns the default allowlist of input extensions.
pub fn supported_formats() -> Vec<String> {
    SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// GenerationOptions
// ============================================================================

/// Full configuration of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    /// Source image, relative to `working_dir` unless absolute.
    pub input: PathBuf,
    /// File name of the packaged `.icns`, inside `output_dir`.
    pub output: PathBuf,
    /// Name of the staging iconset directory, inside `output_dir`.
    pub iconset_dir: PathBuf,
    /// Directory receiving the iconset, the `.icns` and the plain export.
    pub output_dir: PathBuf,
    /// Transparent margin per side, as a percent of each canvas edge.
    pub padding_percent: f64,
    /// Base for every relative path.
    pub working_dir: PathBuf,
    /// Name of the flattened export directory, inside `output_dir`.
    pub plain_dir: PathBuf,
    /// Accepted input extensions, compared case-insensitively.
    pub formats: Vec<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("icon.png"),
            output: PathBuf::from("icon.icns"),
            iconset_dir: PathBuf::from("icon.iconset"),
            output_dir: PathBuf::from("."),
            padding_percent: 0.0,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            plain_dir: PathBuf::from("icons"),
            formats: supported_formats(),
        }
    }
}

impl GenerationOptions {
    /// Builds options from defaults with `overrides` applied on top.
    pub fn from_overrides(overrides: GenerationOverrides) -> Self {
        Self::default().with_overrides(overrides)
    }

    /// Replaces every field that `overrides` sets, keeping the rest.
    pub fn with_overrides(self, overrides: GenerationOverrides) -> Self {
        Self {
            input: overrides.input.unwrap_or(self.input),
            output: overrides.output.unwrap_or(self.output),
            iconset_dir: overrides.iconset_dir.unwrap_or(self.iconset_dir),
            output_dir: overrides.output_dir.unwrap_or(self.output_dir),
            padding_percent: overrides.padding_percent.unwrap_or(self.padding_percent),
            working_dir: overrides.working_dir.unwrap_or(self.working_dir),
            plain_dir: overrides.plain_dir.unwrap_or(self.plain_dir),
            formats: overrides.formats.unwrap_or(self.formats),
        }
    }

    /// Checks values that do not depend on the filesystem.
    pub fn validate(&self) -> Result<()> {
        validate_padding(self.padding_percent)
    }

    /// Returns true if `extension` is in the allowlist (case-insensitive).
    pub fn is_supported_format(&self, extension: &str) -> bool {
        self.formats
            .iter()
            .any(|format| format.eq_ignore_ascii_case(extension))
    }

    /// Absolute or working-dir-relative path of the source image.
    pub fn resolved_input(&self) -> PathBuf {
        resolve(&self.working_dir, &self.input)
    }

    pub fn resolved_output_dir(&self) -> PathBuf {
        resolve(&self.working_dir, &self.output_dir)
    }

    /// Directory the iconset is staged in before packaging.
    pub fn staging_dir(&self) -> PathBuf {
        resolve(&self.resolved_output_dir(), &self.iconset_dir)
    }

    /// Final `.icns` path.
    pub fn output_path(&self) -> PathBuf {
        resolve(&self.resolved_output_dir(), &self.output)
    }

    /// Directory receiving the flattened, unprefixed copies.
    pub fn plain_dir_path(&self) -> PathBuf {
        resolve(&self.resolved_output_dir(), &self.plain_dir)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ============================================================================
// GenerationOverrides
// ============================================================================

/// Caller-supplied subset of [`GenerationOptions`].
///
/// Every field is optional. Serializes to camelCase JSON:
///
/// ```json
/// {
///   "input": "art/logo.svg",
///   "outputDir": "build",
///   "paddingPercent": 10
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GenerationOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iconset_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
}

impl GenerationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(working_dir.into());
        self
    }

    pub fn with_padding(mut self, padding_percent: f64) -> Self {
        self.padding_percent = Some(padding_percent);
        self
    }

    /// Fills every unset field from `fallback`. Fields set on `self` win.
    pub fn or(self, fallback: GenerationOverrides) -> Self {
        Self {
            input: self.input.or(fallback.input),
            output: self.output.or(fallback.output),
            iconset_dir: self.iconset_dir.or(fallback.iconset_dir),
            output_dir: self.output_dir.or(fallback.output_dir),
            padding_percent: self.padding_percent.or(fallback.padding_percent),
            working_dir: self.working_dir.or(fallback.working_dir),
            plain_dir: self.plain_dir.or(fallback.plain_dir),
            formats: self.formats.or(fallback.formats),
        }
    }

    /// Deserializes overrides from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the overrides to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reads overrides from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_path(path)?;
        Self::from_json(&json).map_err(|e| IconsetError::InvalidOptions {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults_are_complete() {
        let options = GenerationOptions::default();
        assert_eq!(options.input, PathBuf::from("icon.png"));
        assert_eq!(options.output, PathBuf::from("icon.icns"));
        assert_eq!(options.iconset_dir, PathBuf::from("icon.iconset"));
        assert_eq!(options.padding_percent, 0.0);
        assert_eq!(options.formats, supported_formats());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn overrides_merge_field_by_field() {
        let options = GenerationOptions::from_overrides(
            GenerationOverrides::new()
                .with_input("art/logo.svg")
                .with_padding(12.0),
        );

        assert_eq!(options.input, PathBuf::from("art/logo.svg"));
        assert_eq!(options.padding_percent, 12.0);
        // untouched fields keep their defaults
        let defaults = GenerationOptions::default();
        assert_eq!(options.output, defaults.output);
        assert_eq!(options.iconset_dir, defaults.iconset_dir);
        assert_eq!(options.formats, defaults.formats);
    }

    #[test]
    fn merging_does_not_leak_between_calls() {
        let first = GenerationOptions::from_overrides(GenerationOverrides::new().with_padding(20.0));
        let second = GenerationOptions::from_overrides(GenerationOverrides::new());
        assert_eq!(first.padding_percent, 20.0);
        assert_eq!(second.padding_percent, 0.0);
    }

    #[test]
    fn earlier_overrides_win_over_fallback() {
        let cli = GenerationOverrides::new().with_padding(5.0);
        let file = GenerationOverrides::new().with_padding(30.0).with_input("file.png");
        let merged = cli.or(file);
        assert_eq!(merged.padding_percent, Some(5.0));
        assert_eq!(merged.input, Some(PathBuf::from("file.png")));
    }

    #[test]
    fn json_uses_camel_case_and_optional_fields() {
        let overrides = GenerationOverrides::from_json(
            r#"{ "outputDir": "build", "iconsetDir": "App.iconset", "formats": ["PNG"] }"#,
        )
        .unwrap();
        assert_eq!(overrides.output_dir, Some(PathBuf::from("build")));
        assert_eq!(overrides.iconset_dir, Some(PathBuf::from("App.iconset")));
        assert!(overrides.input.is_none());

        let empty = GenerationOverrides::from_json("{}").unwrap();
        assert_eq!(empty, GenerationOverrides::default());

        let json = GenerationOverrides::new().with_padding(4.0).to_json_pretty().unwrap();
        assert!(json.contains("\"paddingPercent\""));
        assert!(!json.contains("\"input\""));
    }

    #[test]
    fn paths_resolve_against_working_and_output_dirs() {
        let options = GenerationOptions::from_overrides(
            GenerationOverrides::new()
                .with_working_dir("/work")
                .with_input("art/icon.png")
                .with_output_dir("dist"),
        );

        assert_eq!(options.resolved_input(), PathBuf::from("/work/art/icon.png"));
        assert_eq!(options.staging_dir(), PathBuf::from("/work/dist/icon.iconset"));
        assert_eq!(options.output_path(), PathBuf::from("/work/dist/icon.icns"));
        assert_eq!(options.plain_dir_path(), PathBuf::from("/work/dist/icons"));
    }

    #[test]
    fn absolute_paths_bypass_working_dir() {
        let options = GenerationOptions::from_overrides(
            GenerationOverrides::new()
                .with_working_dir("/work")
                .with_input("/art/icon.png")
                .with_output_dir("/out"),
        );
        assert_eq!(options.resolved_input(), PathBuf::from("/art/icon.png"));
        assert_eq!(options.output_path(), PathBuf::from("/out/icon.icns"));
    }

    #[test]
    fn format_check_ignores_case() {
        let options = GenerationOptions::default();
        assert!(options.is_supported_format("PNG"));
        assert!(options.is_supported_format("Svg"));
        assert!(!options.is_supported_format("xyz"));
    }

    #[test]
    fn validate_rejects_out_of_range_padding() {
        let options = GenerationOptions::from_overrides(GenerationOverrides::new().with_padding(50.0));
        assert_eq!(options.validate().unwrap_err().kind(), ErrorKind::Config);
    }
}
