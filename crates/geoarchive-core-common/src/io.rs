//! The contract the archiver needs from a geodatabase engine.
//!
//! Format crates implement [`GeoWorkspace`] for one kind of source container; the
//! exporters in `geoarchive-core` only ever talk to this trait.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::value::FieldValue;

/// One record of a feature class.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Geometry encoded as Well-Known Text, `None` when the record has no geometry.
    pub geometry_wkt: Option<String>,
    /// Attribute values, in the order the fields were requested.
    pub values: Vec<FieldValue>,
}

impl Record {
    /// Creates a record from its geometry and attribute values.
    #[must_use]
    pub fn new(geometry_wkt: Option<String>, values: Vec<FieldValue>) -> Self {
        Self {
            geometry_wkt,
            values,
        }
    }
}

/// Coordinate system of a feature class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialReference {
    /// Short name such as `GCS_WGS_1984` or `EPSG:4326`, when known.
    pub name: Option<String>,
    /// Canonical string form, usually WKT.
    pub definition: String,
}

impl SpatialReference {
    /// Creates a spatial reference from its canonical string.
    #[must_use]
    pub fn new(name: Option<String>, definition: impl Into<String>) -> Self {
        Self {
            name,
            definition: definition.into(),
        }
    }

    /// The canonical string written into archive preambles.
    #[must_use]
    pub fn export_to_string(&self) -> &str {
        &self.definition
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.definition),
        }
    }
}

/// Layout of structured markup output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkupFormat {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Indented for reading.
    Pretty,
}

/// Stream of records produced by [`GeoWorkspace::records`].
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// Read access to a geospatial source container.
///
/// Every method answers from the container's current contents; anything an
/// implementation keeps in memory is dropped once the underlying data changes.
pub trait GeoWorkspace {
    /// Location of the container.
    fn path(&self) -> &Path;

    /// Names of the feature classes held by the container, in container order.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be listed.
    fn feature_classes(&self) -> Result<Vec<String>>;

    /// Ordered attribute field names of a feature class.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature class is missing or unreadable.
    fn field_names(&self, feature_class: &str) -> Result<Vec<String>>;

    /// Spatial reference of a feature class.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature class is missing or unreadable.
    fn spatial_reference(&self, feature_class: &str) -> Result<SpatialReference>;

    /// Records of a feature class with values for `fields`, in that order.
    ///
    /// Fields a record does not carry come back as [`FieldValue::Null`].
    ///
    /// # Errors
    ///
    /// Returns an error if the feature class cannot be opened; per-record failures
    /// (for instance an unconvertible geometry) surface as items of the stream.
    fn records<'a>(&'a self, feature_class: &str, fields: &[String]) -> Result<RecordStream<'a>>;

    /// Writes a feature class as structured markup to `destination`.
    ///
    /// Returns the number of features written.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the feature class or writing the file fails.
    fn export_markup(
        &self,
        feature_class: &str,
        destination: &Path,
        format: MarkupFormat,
    ) -> Result<u64>;
}
