//! Driver registry for source container formats and their capabilities.
//!
//! This module provides a static registry of source container drivers together with the
//! support status (supported, planned, or not supported) of the three capabilities the
//! archiver relies on: enumerating feature classes, reading them, and converting them
//! directly to structured markup.
//!
//! # Examples
//!
//! ```
//! use geoarchive_core::drivers::{find_driver, get_available_drivers};
//!
//! let geojson = find_driver("GeoJSON").expect("GeoJSON driver should exist");
//! assert!(geojson.capabilities.can_archive());
//!
//! for driver in get_available_drivers() {
//!     println!("{}: {}", driver.short_name, driver.long_name);
//! }
//! ```

use std::path::Path;

use geoarchive_core_common::GeoWorkspace;
use geoarchive_geojson::GeoJsonWorkspace;
use log::debug;

use crate::error::{DriverError, Result, WorkspaceError, driver_not_found};

pub use geoarchive_core_common::drivers::{Driver, DriverCapabilities, SupportStatus};

/// Returns the complete list of registered source container drivers.
#[must_use]
pub fn get_drivers() -> Vec<Driver> {
    use SupportStatus::{NotSupported, Planned, Supported};

    vec![
        Driver::new(
            "GeoJSON",
            "Directory of GeoJSON feature class files",
            Supported,
            Supported,
            Supported,
        ),
        Driver::new("OpenFileGDB", "ESRI FileGDB", Planned, Planned, Planned),
        Driver::new("GPKG", "GeoPackage vector", Planned, Planned, Planned),
        Driver::new(
            "ESRI Shapefile",
            "Directory of ESRI Shapefiles",
            Planned,
            Planned,
            Planned,
        ),
        Driver::new(
            "PGeo",
            "ESRI Personal GeoDatabase",
            NotSupported,
            NotSupported,
            NotSupported,
        ),
    ]
}

/// Returns drivers that have at least one implemented capability.
#[must_use]
pub fn get_available_drivers() -> Vec<Driver> {
    get_drivers()
        .into_iter()
        .filter(|d| d.capabilities.has_any_support())
        .collect()
}

/// Finds a driver by its short name (case-insensitive).
///
/// ```
/// use geoarchive_core::drivers::find_driver;
///
/// let driver = find_driver("geojson").expect("GeoJSON should exist");
/// assert_eq!(driver.short_name, "GeoJSON");
/// assert!(find_driver("InvalidDriver").is_none());
/// ```
#[must_use]
pub fn find_driver(name: &str) -> Option<Driver> {
    get_drivers()
        .into_iter()
        .find(|d| d.short_name.eq_ignore_ascii_case(name))
}

/// Returns all driver short names in alphabetically sorted order.
#[must_use]
pub fn get_driver_names() -> Vec<&'static str> {
    let mut names: Vec<_> = get_drivers().iter().map(|d| d.short_name).collect();
    names.sort_unstable();
    names
}

/// Opens the source container at `path` with the driver named `driver_name`.
///
/// # Errors
///
/// Returns an error if the driver is unknown, cannot archive yet, or the container
/// cannot be opened.
pub fn open_workspace(path: &Path, driver_name: &str) -> Result<Box<dyn GeoWorkspace>> {
    let driver = find_driver(driver_name).ok_or_else(|| driver_not_found(driver_name))?;

    if !driver.capabilities.can_archive() {
        return Err(DriverError::OperationNotSupported {
            driver: driver.short_name.to_string(),
            operation: "archiving".to_string(),
        }
        .into());
    }

    debug!("Opening {} with the {} driver", path.display(), driver.short_name);

    match driver.short_name {
        "GeoJSON" => {
            let workspace = GeoJsonWorkspace::open(path).map_err(|e| WorkspaceError::Open {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
            Ok(Box::new(workspace))
        },
        other => Err(DriverError::NotRegistered {
            driver: other.to_string(),
        }
        .into()),
    }
}
