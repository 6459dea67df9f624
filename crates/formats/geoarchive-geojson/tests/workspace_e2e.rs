//! End-to-end tests for the `GeoJSON` directory workspace

use std::fs;
use std::path::Path;

use geoarchive_core_common::{FieldValue, GeoWorkspace, MarkupFormat};
use geoarchive_geojson::{GeoJsonWorkspace, WGS84_WKT};
use tempfile::TempDir;

const TRAILS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": 1,
     "geometry": {"type": "LineString", "coordinates": [[-147.7, 64.8], [-147.6, 64.9]]},
     "properties": {"Name": "Ridge", "Length": 2.5}},
    {"type": "Feature", "id": 2,
     "geometry": {"type": "LineString", "coordinates": [[-147.5, 64.7], [-147.4, 64.6]]},
     "properties": {"Name": "Creek", "Length": 4}},
    {"type": "Feature", "id": 3,
     "geometry": null,
     "properties": {"Name": "Unmapped", "Opened": "2019-06-15"}}
  ]
}"#;

const SITES_SEQ: &str = "{\"type\":\"Feature\",\"geometry\":{\"type\":\"Point\",\"coordinates\":[1,2]},\"properties\":{\"Code\":\"A1\"}}\n\
{\"type\":\"Feature\",\"geometry\":{\"type\":\"Point\",\"coordinates\":[3,4]},\"properties\":{\"Code\":\"B2\"}}\n";

const ALASKA_ALBERS: &str = "PROJCS[\"NAD_1983_Alaska_Albers\",GEOGCS[\"GCS_North_American_1983\"]]";

fn container(dir: &Path) -> std::path::PathBuf {
    let gdb = dir.join("parks.gdb");
    fs::create_dir(&gdb).unwrap();
    fs::write(gdb.join("Trails.geojson"), TRAILS).unwrap();
    fs::write(gdb.join("Sites.geojsonl"), SITES_SEQ).unwrap();
    fs::write(gdb.join("Sites.prj"), format!("{ALASKA_ALBERS}\n")).unwrap();
    fs::write(gdb.join("README.txt"), "not a layer").unwrap();
    fs::create_dir(gdb.join("nested.geojson")).unwrap();
    gdb
}

#[test]
fn test_enumerates_feature_classes_in_name_order() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();

    assert_eq!(workspace.feature_classes().unwrap(), vec!["Sites", "Trails"]);
}

#[test]
fn test_duplicate_stem_resolves_by_extension_priority() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = container(temp_dir.path());
    fs::write(gdb.join("Trails.json"), "{\"type\":\"FeatureCollection\",\"features\":[]}").unwrap();
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    assert_eq!(workspace.feature_classes().unwrap(), vec!["Sites", "Trails"]);
    // .geojson wins over .json
    assert_eq!(workspace.read_layer("Trails").unwrap().features.len(), 3);
}

#[test]
fn test_fields_and_records() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();

    let fields = workspace.field_names("Trails").unwrap();
    assert_eq!(fields, vec!["Name", "Length", "Opened"]);

    let records: Vec<_> = workspace
        .records("Trails", &fields)
        .unwrap()
        .collect::<anyhow::Result<_>>()
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(records[0].geometry_wkt.as_deref().unwrap().starts_with("LINESTRING"));
    assert_eq!(records[0].values[0], FieldValue::Text("Ridge".to_string()));
    assert_eq!(records[0].values[1], FieldValue::Float(2.5));
    assert_eq!(records[0].values[2], FieldValue::Null);
    assert_eq!(records[1].values[1], FieldValue::Integer(4));
    assert!(records[2].geometry_wkt.is_none());
    assert_eq!(records[2].values[2].render(""), "2019-06-15");
}

#[test]
fn test_values_are_archived_as_stored() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = temp_dir.path().join("survey.gdb");
    fs::create_dir(&gdb).unwrap();
    fs::write(
        gdb.join("Counts.geojson"),
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,
             "properties":{"Serial":18446744073709551615,"Taken":"2019-06-15T08:30:00.123456789"}}
        ]}"#,
    )
    .unwrap();
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    let fields = workspace.field_names("Counts").unwrap();
    let record = workspace
        .records("Counts", &fields)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    let rendered: Vec<String> = record
        .values
        .iter()
        .map(|value| value.render("None").into_owned())
        .collect();

    assert_eq!(
        rendered,
        vec!["18446744073709551615", "2019-06-15T08:30:00.123456789"]
    );
}

#[test]
fn test_sidecar_extension_is_case_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = temp_dir.path().join("upper.gdb");
    fs::create_dir(&gdb).unwrap();
    fs::write(gdb.join("Trails.geojson"), TRAILS).unwrap();
    fs::write(gdb.join("Trails.PRJ"), ALASKA_ALBERS).unwrap();
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    let trails = workspace.spatial_reference("Trails").unwrap();
    assert_eq!(trails.export_to_string(), ALASKA_ALBERS);
}

#[test]
fn test_rewritten_file_is_read_again() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = container(temp_dir.path());
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    assert_eq!(workspace.field_names("Trails").unwrap().len(), 3);
    assert_eq!(workspace.records("Trails", &[]).unwrap().count(), 3);

    fs::write(
        gdb.join("Trails.geojson"),
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":null,"properties":{"Surface":"gravel"}}
        ]}"#,
    )
    .unwrap();

    assert_eq!(workspace.field_names("Trails").unwrap(), vec!["Surface"]);
    assert_eq!(workspace.records("Trails", &[]).unwrap().count(), 1);

    fs::remove_file(gdb.join("Trails.geojson")).unwrap();
    fs::write(gdb.join("Trails.json"), TRAILS).unwrap();
    assert_eq!(workspace.records("Trails", &[]).unwrap().count(), 3);
}

#[test]
fn test_records_follow_requested_field_order() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();

    let fields = vec!["Length".to_string(), "Missing".to_string(), "Name".to_string()];
    let first = workspace
        .records("Trails", &fields)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(
        first.values,
        vec![
            FieldValue::Float(2.5),
            FieldValue::Null,
            FieldValue::Text("Ridge".to_string())
        ]
    );
}

#[test]
fn test_spatial_reference_sources() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();

    let sites = workspace.spatial_reference("Sites").unwrap();
    assert_eq!(sites.export_to_string(), ALASKA_ALBERS);
    assert_eq!(sites.name.as_deref(), Some("NAD_1983_Alaska_Albers"));

    let trails = workspace.spatial_reference("Trails").unwrap();
    assert_eq!(trails.export_to_string(), WGS84_WKT);
}

#[test]
fn test_unknown_feature_class_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();

    let err = workspace.field_names("Roads").unwrap_err();
    assert!(err.to_string().contains("Feature class 'Roads' not found"));
}

#[test]
fn test_invalid_geometry_is_reported_with_its_file() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = temp_dir.path().join("broken.gdb");
    fs::create_dir(&gdb).unwrap();
    fs::write(
        gdb.join("Bad.geojson"),
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{}},
            {"type":"Feature","geometry":{"type":"Point","coordinates":[9]},"properties":{}}
        ]}"#,
    )
    .unwrap();
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    // a short position is rejected either while parsing or while converting the record
    let err = match workspace.records("Bad", &[]) {
        Ok(stream) => stream
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap_err(),
        Err(err) => err,
    };

    assert!(err.to_string().contains("Bad.geojson"), "unexpected message: {err}");
}

#[test]
fn test_export_markup_compact() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = GeoJsonWorkspace::open(container(temp_dir.path())).unwrap();
    let destination = temp_dir.path().join("Sites.json");

    let written = workspace
        .export_markup("Sites", &destination, MarkupFormat::Compact)
        .unwrap();

    assert_eq!(written, 2);
    let text = fs::read_to_string(&destination).unwrap();
    assert!(!text.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][1]["properties"]["Code"], "B2");
}

#[test]
fn test_empty_file_is_empty_feature_class() {
    let temp_dir = TempDir::new().unwrap();
    let gdb = temp_dir.path().join("empty.gdb");
    fs::create_dir(&gdb).unwrap();
    fs::write(gdb.join("Nothing.geojsonl"), "").unwrap();
    let workspace = GeoJsonWorkspace::open(&gdb).unwrap();

    assert!(workspace.field_names("Nothing").unwrap().is_empty());
    assert_eq!(workspace.records("Nothing", &[]).unwrap().count(), 0);
}
