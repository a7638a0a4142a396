//! Packaging of a staged iconset into an `.icns` file.
//!
//! Packaging is delegated to an external compiler behind the narrow
//! [`IconsetPackager`] trait. The default implementation shells out to
//! macOS's `iconutil`; tests plug in closures instead.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{IconsetError, Result};

/// Turns a fully populated iconset directory into a packaged icon file.
pub trait IconsetPackager {
    /// Packages `staging_dir` into `output_path`.
    ///
    /// Called only once every planned image has been written.
    fn package(&self, staging_dir: &Path, output_path: &Path) -> Result<()>;
}

impl<F> IconsetPackager for F
where
    F: Fn(&Path, &Path) -> Result<()>,
{
    fn package(&self, staging_dir: &Path, output_path: &Path) -> Result<()> {
        self(staging_dir, output_path)
    }
}

/// Packages with `iconutil -c icns <dir> -o <file>`.
#[derive(Debug, Clone)]
pub struct Iconutil {
    program: OsString,
}

impl Default for Iconutil {
    fn default() -> Self {
        Self {
            program: OsString::from("iconutil"),
        }
    }
}

impl Iconutil {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different executable with the same command-line contract.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, staging_dir: &Path, output_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-c")
            .arg("icns")
            .arg(staging_dir)
            .arg("-o")
            .arg(output_path);
        command
    }
}

impl IconsetPackager for Iconutil {
    fn package(&self, staging_dir: &Path, output_path: &Path) -> Result<()> {
        debug!(
            program = %self.program.to_string_lossy(),
            staging = %staging_dir.display(),
            output = %output_path.display(),
            "running icon compiler"
        );

        let output = self
            .command(staging_dir, output_path)
            .output()
            .map_err(|e| {
                IconsetError::Packaging(format!(
                    "failed to run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(IconsetError::Packaging(if stderr.is_empty() {
                format!("{} exited with {}", self.program.to_string_lossy(), output.status)
            } else {
                stderr.to_string()
            }));
        }

        Ok(())
    }
}
