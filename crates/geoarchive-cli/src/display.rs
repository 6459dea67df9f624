//! Display utilities for formatting CLI output.
//!
//! Table rows and printing helpers for run summaries, container contents and the driver
//! registry.

use tabled::{Table, Tabled};

use geoarchive_core::drivers::Driver;
use geoarchive_core::types::WorkspaceInfo;
use geoarchive_core::{ArtifactOutcome, BatchSummary};

/// Table row for one artifact of an archive run.
#[derive(Tabled)]
pub struct ArtifactRow {
    #[tabled(rename = "Feature Class")]
    pub feature_class: String,
    #[tabled(rename = "Artifact")]
    pub artifact: String,
    #[tabled(rename = "Status")]
    pub status: String,
    /// Feature count when written, error detail when failed.
    #[tabled(rename = "Detail")]
    pub detail: String,
}

/// Table row for one feature class of a container.
#[derive(Tabled)]
pub struct FeatureClassRow {
    #[tabled(rename = "Feature Class")]
    pub name: String,
    #[tabled(rename = "Fields")]
    pub field_count: usize,
    #[tabled(rename = "Field Names")]
    pub fields: String,
    #[tabled(rename = "Spatial Reference")]
    pub spatial_reference: String,
}

/// Table row representation for displaying driver information.
#[derive(Tabled)]
pub struct DriverRow {
    /// Short identifier for the driver (e.g., `GeoJSON`, `GPKG`).
    #[tabled(rename = "Short Name")]
    pub short_name: String,
    /// Full descriptive name of the driver format.
    #[tabled(rename = "Long Name")]
    pub long_name: String,
    /// Support status for listing feature classes.
    #[tabled(rename = "Enumerate")]
    pub enumerate: String,
    /// Support status for reading feature classes.
    #[tabled(rename = "Read")]
    pub read: String,
    /// Support status for direct GeoJSON conversion.
    #[tabled(rename = "Markup")]
    pub markup: String,
}

/// Rows for every artifact of a run, in processing order.
#[must_use]
pub fn artifact_rows(summary: &BatchSummary) -> Vec<ArtifactRow> {
    summary
        .entities
        .iter()
        .flat_map(|entity| {
            entity.artifacts.iter().map(|artifact| {
                let (status, detail) = match artifact {
                    ArtifactOutcome::Written { features, .. } => {
                        ("Written", format!("{features} feature(s)"))
                    },
                    ArtifactOutcome::Failed { message, .. } => ("Failed", message.clone()),
                };
                ArtifactRow {
                    feature_class: entity.feature_class.clone(),
                    artifact: artifact.path().display().to_string(),
                    status: status.to_string(),
                    detail,
                }
            })
        })
        .collect()
}

/// Print the outcome of an archive run.
pub fn display_summary(summary: &BatchSummary) {
    println!("\nSource: {}", summary.source.display());

    if summary.entities.is_empty() {
        println!("No feature classes found.");
        return;
    }

    println!("{}", Table::new(artifact_rows(summary)));
    println!(
        "\n{} of {} feature class(es) fully archived, {} file(s) written, {} failed",
        summary.archived_feature_classes(),
        summary.total_feature_classes(),
        summary.artifacts_written(),
        summary.artifacts_failed()
    );
}

/// Rows for the feature classes of a container.
#[must_use]
pub fn feature_class_rows(info: &WorkspaceInfo) -> Vec<FeatureClassRow> {
    info.feature_classes
        .iter()
        .map(|fc| FeatureClassRow {
            name: fc.name.clone(),
            field_count: fc.fields.len(),
            fields: fc.fields.join(", "),
            spatial_reference: match (&fc.spatial_reference, &fc.error) {
                (_, Some(error)) => format!("Error: {error}"),
                (Some(spatial_reference), None) => spatial_reference.clone(),
                (None, None) => "N/A".to_string(),
            },
        })
        .collect()
}

/// Display container information in a formatted table.
pub fn display_workspace_info(info: &WorkspaceInfo) {
    println!("\nSource: {}", info.source);
    println!("Driver: {} ({})", info.driver, info.driver_long_name);

    if info.feature_classes.is_empty() {
        println!("\nNo feature classes found.");
        return;
    }

    println!("\n=== Feature Classes ===");
    println!("{}", Table::new(feature_class_rows(info)));
}

/// Print the driver registry.
pub fn display_drivers(drivers: &[Driver]) {
    println!("\nAvailable Drivers ({} total):\n", drivers.len());

    let rows: Vec<DriverRow> = drivers
        .iter()
        .map(|d| DriverRow {
            short_name: d.short_name.to_string(),
            long_name: d.long_name.to_string(),
            enumerate: d.capabilities.enumerate.as_str().to_string(),
            read: d.capabilities.read.as_str().to_string(),
            markup: d.capabilities.markup.as_str().to_string(),
        })
        .collect();

    let table = Table::new(rows).to_string();
    println!("{table}");
}
