//! Common types and traits shared across `GeoArchive` crates.
//!
//! This crate holds the abstractions shared between `geoarchive-core` and the format
//! crates, preventing circular dependencies: the [`GeoWorkspace`] contract, the typed
//! [`FieldValue`] model and the driver definitions.

pub mod drivers;
pub mod io;
pub mod value;

// Re-export commonly used types
pub use drivers::{Driver, DriverCapabilities, SupportStatus};
pub use io::{GeoWorkspace, MarkupFormat, Record, RecordStream, SpatialReference};
pub use value::FieldValue;
