//! Archive run summary and reporting
//!
//! Every artifact attempt of a run ends up here, so the caller can tell a clean run from
//! one where some feature classes were only partly archived.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

/// The two archive artifacts written per feature class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Delimited text with metadata preamble (`.csv`)
    Delimited,
    /// Structured markup, GeoJSON (`.json`)
    Markup,
}

impl ArtifactKind {
    /// File extension of the artifact.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Delimited => "csv",
            Self::Markup => "json",
        }
    }

    /// Short label used in logs and tables.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Markup => "GeoJSON",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one artifact export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The artifact was written
    Written {
        /// Which artifact
        kind: ArtifactKind,
        /// Where it was written
        path: PathBuf,
        /// Number of records or features written
        features: u64,
    },
    /// The export failed; the file may be missing or partial
    Failed {
        /// Which artifact
        kind: ArtifactKind,
        /// Intended destination
        path: PathBuf,
        /// Error detail
        message: String,
    },
}

impl ArtifactOutcome {
    /// Which artifact this outcome is about.
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Written { kind, .. } | Self::Failed { kind, .. } => *kind,
        }
    }

    /// Destination of the artifact.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    /// Returns `true` if the artifact was written.
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Outcomes for one feature class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOutcome {
    /// Feature class name
    pub feature_class: String,
    /// One outcome per attempted artifact, delimited first
    pub artifacts: Vec<ArtifactOutcome>,
}

impl EntityOutcome {
    /// Create an outcome with no artifacts yet
    #[must_use]
    pub fn new(feature_class: impl Into<String>) -> Self {
        Self {
            feature_class: feature_class.into(),
            artifacts: Vec::new(),
        }
    }

    /// Returns `true` if every attempted artifact was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.artifacts.iter().all(ArtifactOutcome::is_written)
    }

    /// Outcome of the given artifact, if it was attempted.
    #[must_use]
    pub fn artifact(&self, kind: ArtifactKind) -> Option<&ArtifactOutcome> {
        self.artifacts.iter().find(|artifact| artifact.kind() == kind)
    }
}

/// Summary of an archive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Source container path
    pub source: PathBuf,

    /// Per feature class outcomes, in processing order
    pub entities: Vec<EntityOutcome>,

    /// Duration of the run
    pub duration: Duration,
}

impl BatchSummary {
    /// Create a new empty summary
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            entities: Vec::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add the outcome of one feature class
    pub fn add_entity(&mut self, entity: EntityOutcome) {
        self.entities.push(entity);
    }

    /// Number of feature classes processed
    #[must_use]
    pub fn total_feature_classes(&self) -> usize {
        self.entities.len()
    }

    /// Number of feature classes with every artifact written
    #[must_use]
    pub fn archived_feature_classes(&self) -> usize {
        self.entities.iter().filter(|e| e.is_complete()).count()
    }

    /// Number of feature classes with at least one failed artifact
    #[must_use]
    pub fn failed_feature_classes(&self) -> usize {
        self.total_feature_classes() - self.archived_feature_classes()
    }

    /// Number of artifacts written
    #[must_use]
    pub fn artifacts_written(&self) -> usize {
        self.artifacts().filter(|a| a.is_written()).count()
    }

    /// Number of artifacts that failed
    #[must_use]
    pub fn artifacts_failed(&self) -> usize {
        self.artifacts().filter(|a| !a.is_written()).count()
    }

    /// Check if the run was successful (no failed artifact)
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.artifacts_failed() == 0
    }

    fn artifacts(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.entities.iter().flat_map(|e| e.artifacts.iter())
    }

    /// Log the summary
    pub fn log_summary(&self) {
        info!(
            "Archive of {} completed in {:.2}s: {} feature class(es), {} archived, {} with failures; {} file(s) written, {} failed",
            self.source.display(),
            self.duration.as_secs_f64(),
            self.total_feature_classes(),
            self.archived_feature_classes(),
            self.failed_feature_classes(),
            self.artifacts_written(),
            self.artifacts_failed()
        );

        if !self.is_successful() {
            warn!("Archive completed with errors");
            for entity in &self.entities {
                for artifact in &entity.artifacts {
                    if let ArtifactOutcome::Failed { kind, message, .. } = artifact {
                        warn!("  {} ({kind}): {message}", entity.feature_class);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(kind: ArtifactKind, name: &str) -> ArtifactOutcome {
        ArtifactOutcome::Written {
            kind,
            path: PathBuf::from(format!("{name}.{}", kind.extension())),
            features: 3,
        }
    }

    fn failed(kind: ArtifactKind, name: &str) -> ArtifactOutcome {
        ArtifactOutcome::Failed {
            kind,
            path: PathBuf::from(format!("{name}.{}", kind.extension())),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_empty_summary_is_successful() {
        let summary = BatchSummary::new("parks.gdb");
        assert!(summary.is_successful());
        assert_eq!(summary.total_feature_classes(), 0);
    }

    #[test]
    fn test_counts() {
        let mut summary = BatchSummary::new("parks.gdb");

        let mut trails = EntityOutcome::new("Trails");
        trails.artifacts.push(written(ArtifactKind::Delimited, "Trails"));
        trails.artifacts.push(written(ArtifactKind::Markup, "Trails"));
        summary.add_entity(trails);

        let mut sites = EntityOutcome::new("Sites");
        sites.artifacts.push(failed(ArtifactKind::Delimited, "Sites"));
        sites.artifacts.push(written(ArtifactKind::Markup, "Sites"));
        summary.add_entity(sites);

        assert_eq!(summary.total_feature_classes(), 2);
        assert_eq!(summary.archived_feature_classes(), 1);
        assert_eq!(summary.failed_feature_classes(), 1);
        assert_eq!(summary.artifacts_written(), 3);
        assert_eq!(summary.artifacts_failed(), 1);
        assert!(!summary.is_successful());

        let sites = &summary.entities[1];
        assert!(!sites.artifact(ArtifactKind::Delimited).unwrap().is_written());
        assert_eq!(
            sites.artifact(ArtifactKind::Markup).unwrap().path(),
            Path::new("Sites.json")
        );
    }

    #[test]
    fn test_artifact_kind() {
        assert_eq!(ArtifactKind::Delimited.extension(), "csv");
        assert_eq!(ArtifactKind::Markup.extension(), "json");
        assert_eq!(ArtifactKind::Markup.to_string(), "GeoJSON");
    }
}
