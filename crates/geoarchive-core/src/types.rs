//! Data types describing a source container.
//!
//! These back the `info` command: what feature classes a container holds, their fields
//! and coordinate systems.

/// Information about a source container.
#[derive(Debug, Clone)]
pub struct WorkspaceInfo {
    /// Path to the container
    pub source: String,
    /// Driver name
    pub driver: String,
    /// Driver long name
    pub driver_long_name: String,
    /// Feature classes, in container order
    pub feature_classes: Vec<FeatureClassInfo>,
}

/// Information about one feature class.
#[derive(Debug, Clone, Default)]
pub struct FeatureClassInfo {
    /// Feature class name
    pub name: String,
    /// Ordered attribute field names
    pub fields: Vec<String>,
    /// Spatial reference name (or definition when unnamed)
    pub spatial_reference: Option<String>,
    /// Why the feature class could not be described, if it could not
    pub error: Option<String>,
}
