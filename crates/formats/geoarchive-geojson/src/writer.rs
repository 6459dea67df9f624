//! `GeoJSON` writer for structured markup archives.

use std::io::Write as IoWrite;

use geoarchive_core_common::MarkupFormat;
use geojson::{Feature, FeatureCollection};

use crate::parser::ParsedLayer;

/// Build the `FeatureCollection` written for a layer.
///
/// Bounding boxes and foreign members such as `crs` are carried over at both levels;
/// every feature gets a `properties` object, empty when the source had none.
#[must_use]
pub fn to_feature_collection(layer: &ParsedLayer) -> FeatureCollection {
    let features = layer
        .features
        .iter()
        .map(|record| Feature {
            bbox: record.bbox.clone(),
            geometry: record.geometry.clone(),
            id: record.id.clone(),
            properties: Some(record.properties.clone()),
            foreign_members: record.foreign_members.clone(),
        })
        .collect();

    FeatureCollection {
        bbox: layer.bbox.clone(),
        features,
        foreign_members: layer.foreign_members.clone(),
    }
}

/// Write a layer as a `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if serialization or writing to the output fails
pub fn write_feature_collection<W: IoWrite>(
    writer: W,
    layer: &ParsedLayer,
    format: MarkupFormat,
) -> serde_json::Result<()> {
    let collection = to_feature_collection(layer);
    match format {
        MarkupFormat::Compact => serde_json::to_writer(writer, &collection),
        MarkupFormat::Pretty => serde_json::to_writer_pretty(writer, &collection),
    }
}

/// Write a layer as a `FeatureCollection` to bytes
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn write_feature_collection_to_bytes(
    layer: &ParsedLayer,
    format: MarkupFormat,
) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_feature_collection(&mut buffer, layer, format)?;
    Ok(buffer)
}
