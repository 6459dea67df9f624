//! Custom error types for `GeoArchive` operations.
//!
//! This module provides structured error handling using `thiserror`. Collaborators
//! (source container implementations) report failures as `anyhow::Error`; the archive
//! operations wrap them into the domain-specific types below so every failure carries
//! the feature class, file or option it concerns.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error carried by the wrapping variants.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for `GeoArchive` operations.
///
/// Display formatting is delegated to the underlying variants.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Source container errors (open, enumerate, query)
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// I/O errors on the output artifacts
    #[error(transparent)]
    Io(#[from] IoError),

    /// Driver-related errors (not found, unsupported operations, etc.)
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised by the source container.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The container could not be opened
    #[error("Failed to open source container '{path}': {source}")]
    Open {
        /// Container path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: BoxedError,
    },

    /// The feature classes of the container could not be listed
    #[error("Failed to list feature classes in '{path}': {source}")]
    Enumerate {
        /// Container path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: BoxedError,
    },

    /// Querying a feature class failed
    #[error("Failed to read {what} of feature class '{feature_class}': {source}")]
    Query {
        /// Feature class being read
        feature_class: String,
        /// What was being read (e.g. "fields", "records")
        what: String,
        /// The underlying error
        #[source]
        source: BoxedError,
    },

    /// Direct conversion of a feature class to markup failed
    #[error("Failed to convert feature class '{feature_class}' to '{destination}': {source}")]
    Convert {
        /// Feature class being converted
        feature_class: String,
        /// Output file
        destination: PathBuf,
        /// The underlying error
        #[source]
        source: BoxedError,
    },
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// Failed to write to a file
    #[error("Failed to write {format} file '{path}': {source}")]
    Write {
        /// The format being written (e.g. "delimited", "GeoJSON")
        format: String,
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: BoxedError,
    },

    /// Failed to delete a stale artifact
    #[error("Failed to delete existing file '{path}': {source}")]
    Remove {
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: BoxedError,
    },

    /// Path is invalid
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path
        path: PathBuf,
        /// Why the path is invalid
        reason: String,
    },
}

/// Driver-related errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Driver was not found in the registry
    #[error("Driver '{name}' not found. Available drivers: {available}")]
    NotFound {
        /// The requested driver name
        name: String,
        /// Comma-separated list of available drivers
        available: String,
    },

    /// Driver does not support the requested operation
    #[error("Driver '{driver}' does not support {operation}")]
    OperationNotSupported {
        /// The driver name
        driver: String,
        /// The operation that's not supported
        operation: String,
    },

    /// Driver has no workspace implementation registered
    #[error("Driver '{driver}' is not registered in the registry")]
    NotRegistered {
        /// The driver name
        driver: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },

    /// Required option is missing
    #[error("Missing required option: {option}")]
    MissingRequired {
        /// The missing option name
        option: String,
    },
}

/// Type alias for Results using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

impl ArchiveError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Workspace(e) => e.user_message(),
            Self::Io(e) => e.user_message(),
            Self::Driver(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Workspace(e) => e.recovery_suggestion(),
            Self::Io(e) => e.recovery_suggestion(),
            Self::Driver(e) => e.recovery_suggestion(),
            Self::Config(_) => Some("Run 'geoarchive export --help' to see valid options.".to_string()),
            Self::Other(_) => None,
        }
    }
}

impl WorkspaceError {
    fn user_message(&self) -> String {
        match self {
            Self::Open { path, .. } => {
                format!("Could not open source container: {}", path.display())
            },
            Self::Enumerate { path, .. } => {
                format!("Could not list feature classes in: {}", path.display())
            },
            Self::Query { .. } | Self::Convert { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Open { .. } | Self::Enumerate { .. } => Some(
                "Check that the source path points to an existing geodatabase directory."
                    .to_string(),
            ),
            Self::Query { .. } | Self::Convert { .. } => None,
        }
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::Write { format, path, .. } => {
                format!("Failed to write {} file: {}", format, path.display())
            },
            Self::Remove { path, .. } => {
                format!("Failed to delete existing file: {}", path.display())
            },
            Self::InvalidPath { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Write { .. } | Self::Remove { .. } => Some(
                "Check that the directory next to the geodatabase is writable.".to_string(),
            ),
            Self::InvalidPath { .. } => {
                Some("Ensure the path is valid and properly formatted.".to_string())
            },
        }
    }
}

impl DriverError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { name, available } => {
                format!(
                    "Driver '{name}' not found.\n\nAvailable drivers:\n{}",
                    available
                        .split(", ")
                        .map(|d| format!("  - {d}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            },
            Self::OperationNotSupported { driver, operation } => {
                format!("The '{driver}' driver does not support {operation}.")
            },
            Self::NotRegistered { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => {
                Some("Run 'geoarchive drivers' to see all available drivers.".to_string())
            },
            Self::OperationNotSupported { .. } => {
                Some("Try using a different driver that supports archiving.".to_string())
            },
            Self::NotRegistered { .. } => None,
        }
    }
}

/// Extension trait for adding file context to I/O results.
pub trait IoErrorExt<T> {
    /// Add write context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Write`] if the underlying operation fails.
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T>;

    /// Add delete context to an error.
    ///
    /// # Errors
    ///
    /// Returns an [`IoError::Remove`] if the underlying operation fails.
    fn with_remove_context(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> IoErrorExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_write_context(self, format: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            ArchiveError::Io(IoError::Write {
                format: format.to_string(),
                path: path.into(),
                source: Box::new(e),
            })
        })
    }

    fn with_remove_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            ArchiveError::Io(IoError::Remove {
                path: path.into(),
                source: Box::new(e),
            })
        })
    }
}

/// Extension trait for adding feature class context to collaborator results.
pub trait WorkspaceErrorExt<T> {
    /// Wrap a failed feature class query.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkspaceError::Query`] if the underlying query fails.
    fn with_query_context(self, feature_class: &str, what: &str) -> Result<T>;

    /// Wrap a failed conversion of `feature_class` into `destination`.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkspaceError::Convert`] if the underlying conversion fails.
    fn with_convert_context(
        self,
        feature_class: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<T>;

    /// Wrap a failed enumeration of `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`WorkspaceError::Enumerate`] if the underlying listing fails.
    fn with_enumerate_context(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> WorkspaceErrorExt<T> for anyhow::Result<T> {
    fn with_query_context(self, feature_class: &str, what: &str) -> Result<T> {
        self.map_err(|e| {
            ArchiveError::Workspace(WorkspaceError::Query {
                feature_class: feature_class.to_string(),
                what: what.to_string(),
                source: e.into(),
            })
        })
    }

    fn with_convert_context(
        self,
        feature_class: &str,
        destination: impl Into<PathBuf>,
    ) -> Result<T> {
        self.map_err(|e| {
            ArchiveError::Workspace(WorkspaceError::Convert {
                feature_class: feature_class.to_string(),
                destination: destination.into(),
                source: e.into(),
            })
        })
    }

    fn with_enumerate_context(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            ArchiveError::Workspace(WorkspaceError::Enumerate {
                path: path.into(),
                source: e.into(),
            })
        })
    }
}

/// Helper to create `DriverError::NotFound` with available drivers.
#[must_use]
pub fn driver_not_found(name: &str) -> DriverError {
    use crate::drivers::get_driver_names;

    let available = get_driver_names().join(", ");
    DriverError::NotFound {
        name: name.to_string(),
        available,
    }
}
