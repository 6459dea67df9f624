//! `GeoJSON` parsing helpers for feature class files.

use std::convert::TryInto;
use std::fmt;
use std::path::Path;

use geo_types::Geometry;
use geoarchive_shared::{SourcePosition, SourceReadError, SourceResult};
use geojson::feature::Id;
use geojson::{Bbox, Feature, FeatureCollection, GeoJson, Geometry as GeoJsonGeometry, JsonObject};
use geozero::ToWkt;

/// RFC 8142 record separator that may prefix each entry of a GeoJSON text sequence.
const RECORD_SEPARATOR: char = '\u{1e}';

/// Parsed `GeoJSON` feature, geometry kept in its `GeoJSON` form.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub id: Option<Id>,
    pub properties: JsonObject,
    pub geometry: Option<GeoJsonGeometry>,
    pub bbox: Option<Bbox>,
    pub foreign_members: Option<JsonObject>,
}

/// All features of one file plus the collection-level `bbox` and foreign members (such
/// as `crs`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLayer {
    pub features: Vec<FeatureRecord>,
    pub bbox: Option<Bbox>,
    pub foreign_members: Option<JsonObject>,
}

impl ParsedLayer {
    /// Property names across all features, in first-seen order.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                if !names.iter().any(|name| name == key) {
                    names.push(key.clone());
                }
            }
        }
        names
    }

    /// Name given by a legacy `"crs": {"type": "name", ...}` member, if any.
    #[must_use]
    pub fn crs_name(&self) -> Option<&str> {
        self.foreign_members
            .as_ref()?
            .get("crs")?
            .get("properties")?
            .get("name")?
            .as_str()
    }
}

/// Parse raw bytes of a feature class file.
///
/// Accepts a `FeatureCollection`, a single `Feature`, a bare geometry, or a
/// newline-delimited sequence of any of those. Blank input is an empty layer.
pub fn parse_geojson_bytes(bytes: &[u8], context: &Path) -> SourceResult<ParsedLayer> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ParsedLayer::default());
    }

    match GeoJson::from_reader(std::io::Cursor::new(bytes)) {
        Ok(geojson) => Ok(geojson_to_layer(geojson)),
        Err(primary_err) => {
            let primary_err_message = primary_err.to_string();
            parse_geojson_sequence(bytes, context)
                .map_err(|sequence_err| combine_errors(&primary_err_message, &sequence_err, context))
        },
    }
}

fn geojson_to_layer(geojson: GeoJson) -> ParsedLayer {
    match geojson {
        GeoJson::FeatureCollection(collection) => feature_collection_to_layer(collection),
        GeoJson::Feature(feature) => ParsedLayer {
            features: vec![feature_to_record(feature)],
            ..ParsedLayer::default()
        },
        GeoJson::Geometry(geometry) => ParsedLayer {
            features: vec![FeatureRecord {
                id: None,
                properties: JsonObject::new(),
                geometry: Some(geometry),
                bbox: None,
                foreign_members: None,
            }],
            ..ParsedLayer::default()
        },
    }
}

fn feature_collection_to_layer(collection: FeatureCollection) -> ParsedLayer {
    ParsedLayer {
        features: collection
            .features
            .into_iter()
            .map(feature_to_record)
            .collect(),
        bbox: collection.bbox,
        foreign_members: collection.foreign_members,
    }
}

fn feature_to_record(feature: Feature) -> FeatureRecord {
    FeatureRecord {
        id: feature.id,
        properties: feature.properties.unwrap_or_default(),
        geometry: feature.geometry,
        bbox: feature.bbox,
        foreign_members: feature.foreign_members,
    }
}

fn parse_geojson_sequence(bytes: &[u8], context: &Path) -> SourceResult<ParsedLayer> {
    let mut layer = ParsedLayer::default();
    for (line_idx, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line_number = (line_idx + 1) as u64;
        let line = std::str::from_utf8(raw_line).map_err(|err| SourceReadError::Parse {
            message: format!("GeoJSON line is not valid UTF-8: {err}"),
            position: Some(SourcePosition::line(line_number)),
            context: Some(context.to_path_buf()),
        })?;
        let line = line.trim().trim_start_matches(RECORD_SEPARATOR);

        if line.is_empty() {
            continue;
        }

        let geojson = line
            .parse::<GeoJson>()
            .map_err(|err| SourceReadError::Parse {
                message: format!("Failed to parse GeoJSON feature: {err}"),
                position: Some(SourcePosition::line(line_number)),
                context: Some(context.to_path_buf()),
            })?;

        let mut parsed = geojson_to_layer(geojson);
        layer.features.append(&mut parsed.features);
    }

    if layer.features.is_empty() {
        Err(SourceReadError::Parse {
            message: "No GeoJSON features found".to_string(),
            position: None,
            context: Some(context.to_path_buf()),
        })
    } else {
        Ok(layer)
    }
}

fn combine_errors(
    collection_err: &str,
    sequence_err: &SourceReadError,
    context: &Path,
) -> SourceReadError {
    let message = format!(
        "Failed to parse GeoJSON document ({collection_err}); \
         also failed to parse as GeoJSON sequence: {sequence_err}"
    );
    SourceReadError::Parse {
        message,
        position: None,
        context: Some(context.to_path_buf()),
    }
}

/// Encode a `GeoJSON` geometry as Well-Known Text.
pub fn geometry_to_wkt(geometry: &GeoJsonGeometry) -> SourceResult<String> {
    if !has_valid_positions(&geometry.value) {
        return Err(SourceReadError::Geometry {
            message: format!(
                "{} has a position with fewer than two coordinates",
                geometry_type(&geometry.value)
            ),
            position: None,
            context: None,
        });
    }

    let geometry: Geometry<f64> =
        geometry
            .clone()
            .try_into()
            .map_err(|err| SourceReadError::Geometry {
                message: format!("Failed to convert GeoJSON geometry: {err}"),
                position: None,
                context: None,
            })?;

    geometry.to_wkt().map_err(|err| SourceReadError::Geometry {
        message: format!("Failed to encode geometry as WKT: {err}"),
        position: None,
        context: None,
    })
}

fn has_valid_positions(value: &geojson::Value) -> bool {
    use geojson::Value;

    fn valid(position: &[f64]) -> bool {
        position.len() >= 2
    }

    match value {
        Value::Point(position) => valid(position),
        Value::MultiPoint(positions) | Value::LineString(positions) => {
            positions.iter().all(|p| valid(p))
        },
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().all(|p| valid(p))
        },
        Value::MultiPolygon(polygons) => polygons.iter().flatten().flatten().all(|p| valid(p)),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .all(|geometry| has_valid_positions(&geometry.value)),
    }
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let geom = match &self.geometry {
            Some(geometry) => geometry_type(&geometry.value),
            None => "None",
        };
        write!(
            f,
            "FeatureRecord {{ properties: {}, geometry: {geom} }}",
            self.properties.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> &'static Path {
        Path::new("Trails.geojson")
    }

    #[test]
    fn parses_feature_collection_with_crs() {
        let input = br#"{
            "type": "FeatureCollection",
            "crs": {"type": "name", "properties": {"name": "EPSG:4326"}},
            "features": [
                {"type": "Feature", "id": 7, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                 "properties": {"Name": "Camp", "Elev": 120}},
                {"type": "Feature", "geometry": null, "properties": {"Note": "no location"}}
            ]
        }"#;

        let layer = parse_geojson_bytes(input, ctx()).unwrap();

        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].id, Some(Id::Number(7.into())));
        assert!(layer.features[1].geometry.is_none());
        assert_eq!(layer.crs_name(), Some("EPSG:4326"));
        assert_eq!(layer.field_names(), vec!["Name", "Elev", "Note"]);
    }

    #[test]
    fn parses_geojson_sequence_with_record_separators() {
        let input = "\u{1e}{\"type\":\"Feature\",\"geometry\":{\"type\":\"Point\",\"coordinates\":[0,0]},\"properties\":{\"a\":1}}\n\
                     \n\
                     {\"type\":\"Feature\",\"geometry\":{\"type\":\"Point\",\"coordinates\":[1,1]},\"properties\":{\"b\":2}}\n";

        let layer = parse_geojson_bytes(input.as_bytes(), ctx()).unwrap();

        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.field_names(), vec!["a", "b"]);
        assert!(layer.crs_name().is_none());
    }

    #[test]
    fn bare_geometry_becomes_single_feature() {
        let input = br#"{"type": "Point", "coordinates": [3.0, 4.0]}"#;
        let layer = parse_geojson_bytes(input, ctx()).unwrap();

        assert_eq!(layer.features.len(), 1);
        assert!(layer.features[0].properties.is_empty());
        assert!(layer.field_names().is_empty());
    }

    #[test]
    fn blank_input_is_empty_layer() {
        let layer = parse_geojson_bytes(b"  \n", ctx()).unwrap();
        assert!(layer.features.is_empty());
    }

    #[test]
    fn invalid_input_reports_both_attempts() {
        let err = parse_geojson_bytes(b"{not json", ctx()).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Failed to parse GeoJSON document"));
        assert!(message.contains("GeoJSON sequence"));
        assert!(message.contains("Trails.geojson"));
    }

    #[test]
    fn converts_geometry_to_wkt() {
        let geometry: GeoJsonGeometry =
            r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#
                .parse()
                .unwrap();

        let wkt = geometry_to_wkt(&geometry).unwrap();

        assert!(wkt.starts_with("LINESTRING"));
        assert!(wkt.contains(','));
    }

    #[test]
    fn rejects_short_positions() {
        let geometry = GeoJsonGeometry::new(geojson::Value::Point(vec![5.0]));

        let err = geometry_to_wkt(&geometry).unwrap_err();

        assert!(err.to_string().contains("fewer than two coordinates"));
    }

    #[test]
    fn displays_feature_record() {
        let input = br#"{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {"a": 1}}"#;
        let layer = parse_geojson_bytes(input, ctx()).unwrap();

        assert_eq!(
            layer.features[0].to_string(),
            "FeatureRecord { properties: 1, geometry: Point }"
        );
    }
}
