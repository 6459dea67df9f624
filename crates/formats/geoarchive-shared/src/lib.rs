//! Error types shared by the source format crates.
//!
//! Format readers report failures through [`SourceReadError`], optionally pinned to a
//! [`SourcePosition`] inside the file being read. The archive driver only ever sees these
//! errors as messages, so the display form is what matters most.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A position within a source file, such as a line of a GeoJSON sequence.
///
/// All indices are 1-based to align with human expectations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePosition {
    /// Line number in the source (1-based)
    pub line: Option<u64>,
    /// Feature number within the source (1-based)
    pub feature: Option<u64>,
}

impl SourcePosition {
    /// Position pointing at a line.
    #[must_use]
    pub fn line(line: u64) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    /// Position pointing at a feature.
    #[must_use]
    pub fn feature(feature: u64) -> Self {
        Self {
            feature: Some(feature),
            ..Self::default()
        }
    }

    /// Returns true when the position does not contain any location metadata.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.feature.is_none()
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(line) = self.line {
            parts.push(format!("line {line}"));
        }
        if let Some(feature) = self.feature {
            parts.push(format!("feature {feature}"));
        }

        if parts.is_empty() {
            f.write_str("unknown position")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

fn fmt_context(context: Option<&PathBuf>) -> String {
    context
        .map(|c| format!(" while reading '{}'", c.display()))
        .unwrap_or_default()
}

fn fmt_position(position: Option<&SourcePosition>) -> String {
    position
        .filter(|pos| !pos.is_empty())
        .map(|pos| format!(" at {pos}"))
        .unwrap_or_default()
}

/// Errors raised while reading feature classes out of a source container.
#[derive(Debug, Error)]
pub enum SourceReadError {
    /// An underlying I/O failure occurred.
    #[error("I/O error{}: {source}", fmt_context(.context.as_ref()))]
    Io {
        /// The originating error.
        #[source]
        source: std::io::Error,
        /// File being read.
        context: Option<PathBuf>,
    },

    /// The source could not be parsed.
    #[error(
        "Parse error{}{}: {message}",
        fmt_context(.context.as_ref()),
        fmt_position(.position.as_ref())
    )]
    Parse {
        /// Human readable description of the failure.
        message: String,
        /// Where the failure occurred, when known.
        position: Option<SourcePosition>,
        /// File being read.
        context: Option<PathBuf>,
    },

    /// A geometry could not be converted to the requested encoding.
    #[error("Geometry error{}{}: {message}", fmt_context(.context.as_ref()), fmt_position(.position.as_ref()))]
    Geometry {
        /// Human readable description of the failure.
        message: String,
        /// Feature holding the geometry.
        position: Option<SourcePosition>,
        /// File being read.
        context: Option<PathBuf>,
    },

    /// The requested feature class does not exist in the container.
    #[error("Feature class '{name}' not found in '{}'", .container.display())]
    FeatureClassNotFound {
        /// Requested name.
        name: String,
        /// Container that was searched.
        container: PathBuf,
    },
}

impl SourceReadError {
    /// Wrap an I/O error raised while touching `path`.
    #[must_use]
    pub fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            context: Some(path.to_path_buf()),
        }
    }

    /// Attach the file being read when the error does not carry one yet.
    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        match &mut self {
            Self::Io { context, .. }
            | Self::Parse { context, .. }
            | Self::Geometry { context, .. } => {
                if context.is_none() {
                    *context = Some(path.to_path_buf());
                }
            },
            Self::FeatureClassNotFound { .. } => {},
        }
        self
    }
}

/// Result type alias that uses [`SourceReadError`].
pub type SourceResult<T> = Result<T, SourceReadError>;
