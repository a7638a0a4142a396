//! Error types for iconset generation.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience result type for iconset operations.
pub type Result<T> = std::result::Result<T, IconsetError>;

/// Broad category of an [`IconsetError`].
///
/// Callers use this to decide how to report a failure (exit code, wording)
/// without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Padding or geometry configuration is unusable.
    Config,
    /// The input file is missing or has an unsupported extension.
    Input,
    /// The image codec could not decode, resize or encode the source.
    Render,
    /// The external icon compiler failed.
    Packaging,
    /// A filesystem operation failed.
    Io,
}

/// All errors produced while planning, rendering, staging or packaging.
#[derive(Error, Debug)]
pub enum IconsetError {
    /// Padding percent is outside `[0, 50)` or not a number.
    #[error("Invalid padding: {0}% (expected a value in [0, 50))")]
    InvalidPadding(f64),

    /// Padding leaves no content area at the given edge length.
    #[error("Padding of {padding_percent}% leaves no content area at {edge_length}x{edge_length}")]
    ContentTooSmall { edge_length: u32, padding_percent: f64 },

    /// An options file could not be parsed.
    #[error("Invalid options file {}: {reason}", .path.display())]
    InvalidOptions { path: PathBuf, reason: String },

    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported input format '{extension}'. Supported formats: {}", .supported.join(", "))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },

    /// The source image could not be read or parsed.
    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    /// The resized or masked image could not be produced.
    #[error("Failed to render {} at {edge_length}px: {reason}", .path.display())]
    Resize {
        path: PathBuf,
        edge_length: u32,
        reason: String,
    },

    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl IconsetError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPadding(_) | Self::ContentTooSmall { .. } | Self::InvalidOptions { .. } => {
                ErrorKind::Config
            }
            Self::InputNotFound(_) | Self::UnsupportedFormat { .. } => ErrorKind::Input,
            Self::Decode { .. } | Self::Resize { .. } | Self::Encode(_) => ErrorKind::Render,
            Self::Packaging(_) => ErrorKind::Packaging,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn decode(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Attaches a path to `io::Result` failures.
pub(crate) trait IoContext<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| IconsetError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_message_names_path() {
        let err = IconsetError::InputNotFound(PathBuf::from("/tmp/nope.png"));
        assert_eq!(err.to_string(), "Input file does not exist: /tmp/nope.png");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn unsupported_format_lists_accepted_extensions() {
        let err = IconsetError::UnsupportedFormat {
            extension: "xyz".into(),
            supported: vec!["png".into(), "svg".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'xyz'"));
        assert!(msg.ends_with("png, svg"));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(IconsetError::InvalidPadding(60.0).kind(), ErrorKind::Config);
        assert_eq!(
            IconsetError::Packaging("boom".into()).kind(),
            ErrorKind::Packaging
        );
        assert_eq!(
            IconsetError::decode("a.png", "bad header").kind(),
            ErrorKind::Render
        );
    }
}
