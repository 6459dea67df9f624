//! Configuration of an archive run.
//!
//! [`ExportConfig`] carries everything the exporters need besides the source container
//! itself: the descriptive metadata written into every preamble, the delimited writer
//! options and the markup layout. It is passed explicitly into every operation.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use geoarchive_core_common::{MarkupFormat, SpatialReference};
use geoarchive_delimited::{DelimitedWriterOptions, Preamble};

use crate::error::{ConfigError, IoError, Result};
use crate::summary::ArtifactKind;

/// Descriptive metadata, constant across a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveMetadata {
    /// Dataset title
    pub title: String,
    /// Attribution (citation) for the dataset
    pub attribution: String,
    /// Dataset abstract
    pub abstract_text: String,
    /// Terms of use
    pub terms_of_use: String,
    /// Dataset contact
    pub contact: String,
}

/// Settings for one archive run.
///
/// ```
/// use geoarchive_core::config::ExportConfig;
///
/// let config = ExportConfig::new("data/parks.gdb")
///     .with_title("Park Trails")
///     .with_delimiter("|");
/// assert!(config.validate().is_ok());
/// assert_eq!(config.output_dir(), std::path::Path::new("data"));
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Source container path
    pub source: PathBuf,
    /// Metadata written into every delimited preamble
    pub metadata: ArchiveMetadata,
    /// Delimiter, trailing delimiter and null token
    pub delimited: DelimitedWriterOptions,
    /// Layout of the markup artifact
    pub markup_format: MarkupFormat,
}

impl ExportConfig {
    /// Configuration with empty metadata and default writer options.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            metadata: ArchiveMetadata::default(),
            delimited: DelimitedWriterOptions::default(),
            markup_format: MarkupFormat::Compact,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = title.into();
        self
    }

    #[must_use]
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.metadata.attribution = attribution.into();
        self
    }

    #[must_use]
    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.metadata.abstract_text = abstract_text.into();
        self
    }

    #[must_use]
    pub fn with_terms_of_use(mut self, terms_of_use: impl Into<String>) -> Self {
        self.metadata.terms_of_use = terms_of_use.into();
        self
    }

    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.metadata.contact = contact.into();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimited = self.delimited.with_delimiter(delimiter);
        self
    }

    /// Toggle the delimiter written after the last value of every row.
    #[must_use]
    pub fn with_trailing_delimiter(mut self, trailing_delimiter: bool) -> Self {
        self.delimited = self.delimited.with_trailing_delimiter(trailing_delimiter);
        self
    }

    #[must_use]
    pub fn with_null_value(mut self, null_value: impl Into<String>) -> Self {
        self.delimited = self.delimited.with_null_value(null_value);
        self
    }

    #[must_use]
    pub fn with_markup_format(mut self, markup_format: MarkupFormat) -> Self {
        self.markup_format = markup_format;
        self
    }

    /// Check the settings before anything is touched on disk.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty source path or an empty delimiter or
    /// one containing a line break, and an [`IoError::InvalidPath`] when the source
    /// path has no final component to name the container by, even once resolved.
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                option: "source".to_string(),
            }
            .into());
        }

        let delimiter = &self.delimited.delimiter;
        if delimiter.is_empty() {
            return Err(ConfigError::InvalidOption {
                option: "delimiter".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        if delimiter.contains(['\n', '\r']) {
            return Err(ConfigError::InvalidOption {
                option: "delimiter".to_string(),
                message: "must not contain line breaks".to_string(),
            }
            .into());
        }

        if self.named_source().file_name().is_none() {
            return Err(IoError::InvalidPath {
                path: self.source.clone(),
                reason: "source path does not name a container".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Source path ending in the container's own name.
    ///
    /// Paths such as `.` or `data/..` are resolved against the filesystem first.
    fn named_source(&self) -> Cow<'_, Path> {
        if self.source.file_name().is_some() {
            return Cow::Borrowed(&self.source);
        }
        fs::canonicalize(&self.source).map_or(Cow::Borrowed(self.source.as_path()), Cow::Owned)
    }

    /// Directory receiving the artifacts: the parent of the source container.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        let source = self.named_source();
        match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Base file name of the source container.
    #[must_use]
    pub fn container_name(&self) -> String {
        let source = self.named_source();
        source.file_name().map_or_else(
            || source.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }

    /// Destination of an artifact of `feature_class`.
    #[must_use]
    pub fn artifact_path(&self, feature_class: &str, kind: ArtifactKind) -> PathBuf {
        self.output_dir()
            .join(format!("{feature_class}.{}", kind.extension()))
    }

    /// Preamble of the delimited artifact of `feature_class`.
    #[must_use]
    pub fn preamble(&self, feature_class: &str, spatial_reference: &SpatialReference) -> Preamble {
        Preamble {
            title: self.metadata.title.clone(),
            abstract_text: self.metadata.abstract_text.clone(),
            attribution: self.metadata.attribution.clone(),
            spatial_reference: spatial_reference.export_to_string().to_string(),
            terms_of_use: self.metadata.terms_of_use.clone(),
            feature_class: feature_class.to_string(),
            container_name: self.container_name(),
            contact: self.metadata.contact.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::new("parks.gdb");
        assert_eq!(config.delimited.delimiter, "|");
        assert!(config.delimited.trailing_delimiter);
        assert_eq!(config.delimited.null_value, "None");
        assert_eq!(config.markup_format, MarkupFormat::Compact);
    }

    #[test]
    fn test_output_dir_without_parent_is_current_dir() {
        let config = ExportConfig::new("parks.gdb");
        assert_eq!(config.output_dir(), Path::new("."));
        assert_eq!(
            config.artifact_path("Trails", ArtifactKind::Delimited),
            Path::new("./Trails.csv")
        );
    }

    #[test]
    fn test_artifact_paths_sit_next_to_container() {
        let config = ExportConfig::new("/data/parks.gdb/");
        assert_eq!(config.container_name(), "parks.gdb");
        assert_eq!(
            config.artifact_path("Sites", ArtifactKind::Markup),
            Path::new("/data/Sites.json")
        );
    }

    #[test]
    fn test_validate_rejects_bad_delimiters() {
        let empty = ExportConfig::new("parks.gdb").with_delimiter("");
        assert!(matches!(
            empty.validate(),
            Err(ArchiveError::Config(ConfigError::InvalidOption { .. }))
        ));

        let newline = ExportConfig::new("parks.gdb").with_delimiter("|\n");
        let err = newline.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid delimiter option: must not contain line breaks"
        );

        assert!(ExportConfig::new("parks.gdb").with_delimiter("::").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_source() {
        assert!(matches!(
            ExportConfig::new("").validate(),
            Err(ArchiveError::Config(ConfigError::MissingRequired { .. }))
        ));
        assert!(matches!(
            ExportConfig::new("/").validate(),
            Err(ArchiveError::Io(IoError::InvalidPath { .. }))
        ));
    }

    #[test]
    fn test_relative_dot_sources_are_resolved() {
        let cwd = fs::canonicalize(".").unwrap();

        let here = ExportConfig::new(".");
        assert!(here.validate().is_ok());
        assert_eq!(
            here.container_name(),
            cwd.file_name().unwrap().to_string_lossy()
        );
        assert_eq!(here.output_dir(), cwd.parent().unwrap());

        let parent = ExportConfig::new("..");
        assert!(parent.validate().is_ok());
        assert_eq!(
            parent.artifact_path("Trails", ArtifactKind::Delimited),
            cwd.parent().unwrap().parent().unwrap().join("Trails.csv")
        );
    }

    #[test]
    fn test_preamble_uses_metadata() {
        let config = ExportConfig::new("data/parks.gdb")
            .with_title("Park Trails")
            .with_abstract("Trail centerlines")
            .with_attribution("NPS")
            .with_terms_of_use("Public domain")
            .with_contact("gis@example.org");
        let spatial_reference = SpatialReference::new(None, "EPSG:3338");

        let preamble = config.preamble("Trails", &spatial_reference);

        assert_eq!(preamble.title, "Park Trails");
        assert_eq!(preamble.spatial_reference, "EPSG:3338");
        assert_eq!(preamble.container_name, "parks.gdb");
        assert_eq!(preamble.feature_class, "Trails");
        assert_eq!(preamble.contact, "gis@example.org");
    }
}
