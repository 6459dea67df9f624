//! `geoarchive-core` is the core library of the `GeoArchive` project: it turns every
//! feature class of a geodatabase into plain-text archives for long-term preservation.
//!
//! This crate includes:
//! - **Driver Registry**: the source container formats and what they can do.
//! - **Configuration**: [`config::ExportConfig`], the settings of one archive run.
//! - **Operations**: the delimited and markup exporters and the batch driver
//!   [`operations::run_archive`], which isolates failures per feature class.
//! - **Errors and summaries**: typed errors and the per-run [`summary::BatchSummary`].

pub mod config;
pub mod drivers;
pub mod error;
pub mod operations;
pub mod summary;
pub mod types;

pub use config::{ArchiveMetadata, ExportConfig};
pub use error::{ArchiveError, Result};
pub use operations::{describe_workspace, export_delimited, export_markup, run_archive};
pub use summary::{ArtifactKind, ArtifactOutcome, BatchSummary, EntityOutcome};

pub use geoarchive_core_common::{GeoWorkspace, MarkupFormat};
