//! `GeoJSON` source container and markup writer for `GeoArchive`.
//!
//! [`GeoJsonWorkspace`] treats a directory of `GeoJSON` files as a geodatabase: one file
//! per feature class. It implements the [`GeoWorkspace`](geoarchive_core_common::GeoWorkspace)
//! contract, including the direct feature class to `GeoJSON` conversion used for the
//! structured markup archive.

pub mod parser;
pub mod value;
pub mod workspace;
pub mod writer;

pub use parser::{FeatureRecord, ParsedLayer, geometry_to_wkt, parse_geojson_bytes};
pub use value::json_to_field_value;
pub use workspace::{FEATURE_CLASS_EXTENSIONS, GeoJsonWorkspace, WGS84_WKT};
pub use writer::{to_feature_collection, write_feature_collection, write_feature_collection_to_bytes};
