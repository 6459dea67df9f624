//! Core archive operations.
//!
//! The batch driver [`run_archive`] enumerates the feature classes of a source container
//! and, for each of them in order, writes the delimited archive and then the GeoJSON
//! archive next to the container. Each artifact export is isolated: its failure is
//! logged and recorded in the [`BatchSummary`] and the run moves on.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use geoarchive_core_common::{Driver, GeoWorkspace};
use geoarchive_delimited::DelimitedWriter;
use log::{debug, error, info};

use crate::config::ExportConfig;
use crate::error::{IoErrorExt, Result, WorkspaceErrorExt};
use crate::summary::{ArtifactKind, ArtifactOutcome, BatchSummary, EntityOutcome};
use crate::types::{FeatureClassInfo, WorkspaceInfo};

/// Deletes an artifact left over from an earlier run.
///
/// Returns `true` if a file was deleted.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be deleted (for instance when it is a
/// directory).
pub fn remove_stale_artifact(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path).with_remove_context(path)?;
    info!("File exists: {}. Deleted", path.display());
    Ok(true)
}

/// Writes `<dir>/<feature_class>.csv`: metadata preamble, header row, one row per record.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns an error if the stale file cannot be deleted, the workspace query fails for
/// the fields, spatial reference or any record, or writing the file fails. The file may
/// be left partially written.
pub fn export_delimited(
    workspace: &dyn GeoWorkspace,
    feature_class: &str,
    config: &ExportConfig,
) -> Result<u64> {
    let destination = config.artifact_path(feature_class, ArtifactKind::Delimited);
    remove_stale_artifact(&destination)?;

    let format = ArtifactKind::Delimited.label();
    let file = File::create(&destination).with_write_context(format, &destination)?;
    let mut writer = DelimitedWriter::new(BufWriter::new(file), config.delimited.clone());
    debug!("Writing {}", destination.display());

    let fields = workspace
        .field_names(feature_class)
        .with_query_context(feature_class, "fields")?;
    let spatial_reference = workspace
        .spatial_reference(feature_class)
        .with_query_context(feature_class, "spatial reference")?;

    writer
        .write_preamble(&config.preamble(feature_class, &spatial_reference))
        .with_write_context(format, &destination)?;
    writer
        .write_header(&fields)
        .with_write_context(format, &destination)?;

    let records = workspace
        .records(feature_class, &fields)
        .with_query_context(feature_class, "records")?;
    for record in records {
        let record = record.with_query_context(feature_class, "records")?;
        writer
            .write_record(&record)
            .with_write_context(format, &destination)?;
    }

    let rows = writer.rows();
    let buffered = writer.finish().with_write_context(format, &destination)?;
    buffered
        .get_ref()
        .sync_all()
        .with_write_context(format, &destination)?;

    Ok(rows)
}

/// Writes `<dir>/<feature_class>.json` through the workspace's direct conversion.
///
/// Returns the number of features written.
///
/// # Errors
///
/// Returns an error if the stale file cannot be deleted or the conversion fails.
pub fn export_markup(
    workspace: &dyn GeoWorkspace,
    feature_class: &str,
    config: &ExportConfig,
) -> Result<u64> {
    let destination = config.artifact_path(feature_class, ArtifactKind::Markup);
    remove_stale_artifact(&destination)?;

    info!("Exporting {}", destination.display());
    workspace
        .export_markup(feature_class, &destination, config.markup_format)
        .with_convert_context(feature_class, &destination)
}

fn isolate(
    feature_class: &str,
    kind: ArtifactKind,
    config: &ExportConfig,
    export: impl FnOnce() -> Result<u64>,
) -> ArtifactOutcome {
    let path = config.artifact_path(feature_class, kind);
    match export() {
        Ok(features) => ArtifactOutcome::Written {
            kind,
            path,
            features,
        },
        Err(err) => {
            error!("Export failed for feature class {feature_class}: {err}");
            ArtifactOutcome::Failed {
                kind,
                path,
                message: err.to_string(),
            }
        },
    }
}

/// Archives one feature class: delimited export, then markup export.
///
/// Never fails; each artifact's outcome is reported in the returned [`EntityOutcome`].
#[must_use]
pub fn archive_feature_class(
    workspace: &dyn GeoWorkspace,
    feature_class: &str,
    config: &ExportConfig,
) -> EntityOutcome {
    let mut outcome = EntityOutcome::new(feature_class);
    outcome.artifacts.push(isolate(
        feature_class,
        ArtifactKind::Delimited,
        config,
        || export_delimited(workspace, feature_class, config),
    ));
    outcome.artifacts.push(isolate(
        feature_class,
        ArtifactKind::Markup,
        config,
        || export_markup(workspace, feature_class, config),
    ));
    outcome
}

/// Archives every feature class of `workspace`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the feature classes cannot be
/// enumerated; no artifact is written in either case. Failures of individual artifacts
/// are not errors, they are reported in the returned [`BatchSummary`].
pub fn run_archive(workspace: &dyn GeoWorkspace, config: &ExportConfig) -> Result<BatchSummary> {
    config.validate()?;
    let start = Instant::now();

    let feature_classes = match workspace
        .feature_classes()
        .with_enumerate_context(workspace.path())
    {
        Ok(names) => names,
        Err(err) => {
            error!("Error: {err}");
            return Err(err);
        },
    };
    debug!(
        "Archiving {} feature class(es) into {}",
        feature_classes.len(),
        config.output_dir().display()
    );

    let mut summary = BatchSummary::new(&config.source);
    for feature_class in &feature_classes {
        info!("Processing {feature_class}");
        summary.add_entity(archive_feature_class(workspace, feature_class, config));
    }

    let summary = summary.with_duration(start.elapsed());
    summary.log_summary();
    Ok(summary)
}

/// Lists the feature classes of `workspace` with their fields and spatial reference.
///
/// # Errors
///
/// Returns an error if the feature classes cannot be enumerated. A feature class that
/// cannot be described is reported through [`FeatureClassInfo::error`].
pub fn describe_workspace(workspace: &dyn GeoWorkspace, driver: &Driver) -> Result<WorkspaceInfo> {
    let names = workspace
        .feature_classes()
        .with_enumerate_context(workspace.path())?;

    let feature_classes = names
        .into_iter()
        .map(|name| {
            let described = workspace.field_names(&name).and_then(|fields| {
                let spatial_reference = workspace.spatial_reference(&name)?;
                Ok((fields, spatial_reference))
            });
            match described {
                Ok((fields, spatial_reference)) => FeatureClassInfo {
                    name,
                    fields,
                    spatial_reference: Some(spatial_reference.to_string()),
                    error: None,
                },
                Err(err) => FeatureClassInfo {
                    name,
                    error: Some(err.to_string()),
                    ..FeatureClassInfo::default()
                },
            }
        })
        .collect();

    Ok(WorkspaceInfo {
        source: workspace.path().display().to_string(),
        driver: driver.short_name.to_string(),
        driver_long_name: driver.long_name.to_string(),
        feature_classes,
    })
}
