//! Iconset assembly: validation, staging, packaging and plain export.
//!
//! A run is a full rebuild. The staging and plain-export directories are
//! wiped and recreated every time, so nothing from an earlier run survives.
//! A run owns its output directory exclusively; concurrent runs against the
//! same directory must be serialized by the caller.
//!
//! # Example
//!
//! ```no_run
//! use iconset_forge::{GenerationOptions, GenerationOverrides, IconsetAssembler, Iconutil};
//!
//! let options = GenerationOptions::from_overrides(
//!     GenerationOverrides::new().with_input("logo.svg").with_padding(10.0),
//! );
//! let report = IconsetAssembler::new(options).generate(&Iconutil::new())?;
//! println!("{}", report.output_path.display());
//! # Ok::<(), iconset_forge::IconsetError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{IconsetError, IoContext, Result};
use crate::icon::IconGeometry;
use crate::options::GenerationOptions;
use crate::packager::IconsetPackager;
use crate::render::{self, SourceImage};
use crate::size::{SizeSpec, iconset_sizes};

/// Filename prefix stripped from plain-export copies.
pub const ICON_PREFIX: &str = "icon_";

/// Deletes `path` (if present) and recreates it as an empty directory.
///
/// This is destructive: any previous contents are removed without asking.
/// Calling it twice in a row leaves the same empty directory. A regular file
/// at `path` is refused rather than removed.
pub fn reset_directory(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            warn!(path = %path.display(), "clearing existing directory");
            fs::remove_dir_all(path).with_path(path)?;
        }
        Ok(_) => {
            return Err(IconsetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"),
            ));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(IconsetError::io(path, e)),
    }
    fs::create_dir_all(path).with_path(path)
}

/// Strips the `icon_` prefix from a staged file name.
pub fn plain_file_name(name: &str) -> &str {
    name.strip_prefix(ICON_PREFIX).unwrap_or(name)
}

/// One image written into the staging directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub spec: SizeSpec,
    pub path: PathBuf,
}

/// A fully populated staging directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedIconset {
    pub dir: PathBuf,
    /// Files in planner order.
    pub files: Vec<StagedFile>,
}

/// Outcome of a successful end-to-end run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub staging_dir: PathBuf,
    /// The packaged `.icns`. Only reported once packaging succeeded.
    pub output_path: PathBuf,
    pub plain_files: Vec<PathBuf>,
}

/// Drives the size planner and renderer to build an iconset on disk.
#[derive(Debug, Clone)]
pub struct IconsetAssembler {
    options: GenerationOptions,
    sizes: Vec<SizeSpec>,
}

impl IconsetAssembler {
    /// Creates an assembler for the canonical macOS size plan.
    pub fn new(options: GenerationOptions) -> Self {
        Self::with_sizes(options, iconset_sizes())
    }

    /// Creates an assembler for a custom size plan.
    pub fn with_sizes(options: GenerationOptions, sizes: Vec<SizeSpec>) -> Self {
        Self { options, sizes }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn sizes(&self) -> &[SizeSpec] {
        &self.sizes
    }

    /// Checks configuration and input before anything on disk changes.
    ///
    /// Padding is checked against every planned size first, then the input
    /// file's existence, then its extension. Returns the resolved input path.
    pub fn validate(&self) -> Result<PathBuf> {
        self.options.validate()?;
        for spec in &self.sizes {
            IconGeometry::new(spec.edge_length, self.options.padding_percent)?;
        }

        let input = self.options.resolved_input();
        if !input.is_file() {
            return Err(IconsetError::InputNotFound(input));
        }

        let extension = input
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !self.options.is_supported_format(extension) {
            return Err(IconsetError::UnsupportedFormat {
                extension: extension.to_string(),
                supported: self.options.formats.clone(),
            });
        }

        Ok(input)
    }

    /// Validates, resets the staging directory and renders every planned size.
    ///
    /// A render failure aborts the run. Files already written by earlier
    /// sizes stay in place and the staging directory should be treated as
    /// undefined until the next run resets it.
    pub fn stage(&self) -> Result<StagedIconset> {
        let input = self.validate()?;

        let output_dir = self.options.resolved_output_dir();
        fs::create_dir_all(&output_dir).with_path(&output_dir)?;

        let dir = self.options.staging_dir();
        reset_directory(&dir)?;

        let source = SourceImage::open(&input)?;
        info!(
            input = %input.display(),
            staging = %dir.display(),
            sizes = self.sizes.len(),
            "rendering iconset"
        );

        let mut files = Vec::with_capacity(self.sizes.len());
        for spec in &self.sizes {
            let geometry = IconGeometry::new(spec.edge_length, self.options.padding_percent)?;
            let image = render::render_with_geometry(&source, &geometry)?;
            let png = render::encode_png(&image)?;

            let path = dir.join(&spec.name);
            fs::write(&path, png).with_path(&path)?;
            debug!(file = %spec.name, size = spec.edge_length, padding = geometry.padding_px, "rendered");

            files.push(StagedFile {
                spec: spec.clone(),
                path,
            });
        }

        Ok(StagedIconset { dir, files })
    }

    /// Copies every staged file into the plain-export directory without the
    /// `icon_` prefix. The export directory is reset first.
    pub fn export_plain(&self, staged: &StagedIconset) -> Result<Vec<PathBuf>> {
        let plain_dir = self.options.plain_dir_path();
        reset_directory(&plain_dir)?;

        staged
            .files
            .iter()
            .map(|file| {
                let target = plain_dir.join(plain_file_name(&file.spec.name));
                fs::copy(&file.path, &target).with_path(&target)?;
                Ok(target)
            })
            .collect()
    }

    /// Runs the whole pipeline: stage, package, then export plain copies.
    pub fn generate(&self, packager: &dyn IconsetPackager) -> Result<GenerationReport> {
        let staged = self.stage()?;

        let output_path = self.options.output_path();
        packager.package(&staged.dir, &output_path)?;
        info!(output = %output_path.display(), "packaged icon");

        let plain_files = self.export_plain(&staged)?;
        info!(
            dir = %self.options.plain_dir_path().display(),
            files = plain_files.len(),
            "exported plain images"
        );

        Ok(GenerationReport {
            staging_dir: staged.dir,
            output_path,
            plain_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::GenerationOverrides;
    use crate::size::plan_sizes;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn options_in(dir: &Path, input: &str) -> GenerationOptions {
        GenerationOptions::from_overrides(
            GenerationOverrides::new()
                .with_working_dir(dir)
                .with_input(input)
                .with_output_dir("out"),
        )
    }

    fn write_png(path: &Path, size: u32) {
        RgbaImage::from_pixel(size, size, Rgba([10, 200, 30, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn reset_directory_clears_and_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.png"), b"old").unwrap();

        reset_directory(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        reset_directory(&dir).unwrap();
        assert!(dir.is_dir());

        let missing = tmp.path().join("fresh/nested");
        reset_directory(&missing).unwrap();
        assert!(missing.is_dir());
    }

    #[test]
    fn reset_directory_refuses_files() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("icon.iconset");
        fs::write(&file, b"not a dir").unwrap();

        assert_eq!(reset_directory(&file).unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(fs::read(&file).unwrap(), b"not a dir");
    }

    #[test]
    fn plain_names_drop_prefix() {
        assert_eq!(plain_file_name("icon_16x16@2x.png"), "16x16@2x.png");
        assert_eq!(plain_file_name("other.png"), "other.png");
    }

    #[test]
    fn stage_writes_custom_plan() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("src.png"), 64);

        let assembler = IconsetAssembler::with_sizes(options_in(tmp.path(), "src.png"), plan_sizes(&[16, 32]));
        let staged = assembler.stage().unwrap();

        let names: Vec<_> = staged.files.iter().map(|f| f.spec.name.as_str()).collect();
        assert_eq!(
            names,
            ["icon_16x16.png", "icon_16x16@2x.png", "icon_32x32.png", "icon_32x32@2x.png"]
        );
        for file in &staged.files {
            let img = image::open(&file.path).unwrap();
            assert_eq!(img.width(), file.spec.edge_length);
            assert_eq!(img.height(), file.spec.edge_length);
        }
    }

    #[test]
    fn stage_removes_stale_files() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("src.png"), 32);
        let stale_dir = tmp.path().join("out/icon.iconset");
        fs::create_dir_all(&stale_dir).unwrap();
        fs::write(stale_dir.join("leftover.png"), b"stale").unwrap();

        let assembler = IconsetAssembler::with_sizes(options_in(tmp.path(), "src.png"), plan_sizes(&[16]));
        assembler.stage().unwrap();

        assert!(!stale_dir.join("leftover.png").exists());
        assert_eq!(fs::read_dir(&stale_dir).unwrap().count(), 2);
    }

    #[test]
    fn padding_too_large_for_smallest_size_fails_before_io() {
        let tmp = TempDir::new().unwrap();
        let mut options = options_in(tmp.path(), "missing.png");
        options.padding_percent = 49.0;

        let err = IconsetAssembler::new(options).stage().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn failed_packaging_reports_no_output() {
        let tmp = TempDir::new().unwrap();
        write_png(&tmp.path().join("src.png"), 32);
        let assembler = IconsetAssembler::with_sizes(options_in(tmp.path(), "src.png"), plan_sizes(&[16]));

        let failing = |_: &Path, _: &Path| -> Result<()> { Err(IconsetError::Packaging("iconutil: bad iconset".into())) };
        let err = assembler.generate(&failing).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Packaging);
        assert!(err.to_string().contains("bad iconset"));
        assert!(!tmp.path().join("out/icons").exists());
    }

    #[test]
    fn corrupt_source_is_a_render_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.png"), b"definitely not a png").unwrap();

        let err = IconsetAssembler::new(options_in(tmp.path(), "broken.png"))
            .stage()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn render_failure_skips_packaging_and_export() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.png"), b"definitely not a png").unwrap();
        let assembler = IconsetAssembler::new(options_in(tmp.path(), "broken.png"));

        let calls = RefCell::new(Vec::new());
        let recording = |dir: &Path, out: &Path| -> Result<()> {
            calls.borrow_mut().push((dir.to_path_buf(), out.to_path_buf()));
            Ok(())
        };

        let err = assembler.generate(&recording).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(calls.into_inner().is_empty());
        assert!(!tmp.path().join("out/icons").exists());
        assert!(!tmp.path().join("out/icon.icns").exists());
    }
}
