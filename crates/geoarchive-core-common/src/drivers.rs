//! Source container driver definitions.
//!
//! A driver describes one kind of source container (a directory of GeoJSON files, a file
//! geodatabase, a GeoPackage, ...) together with the support status of the three
//! capabilities the archiver needs from it.

/// Support status for a specific driver capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// The capability is implemented.
    Supported,
    /// The capability is not supported by the driver.
    NotSupported,
    /// The capability is planned for future implementation.
    Planned,
}

impl SupportStatus {
    /// Returns `true` if the capability is implemented.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported)
    }

    /// Returns the string representation of this support status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SupportStatus::Supported => "Supported",
            SupportStatus::NotSupported => "Not Supported",
            SupportStatus::Planned => "Planned",
        }
    }
}

/// Capabilities a source container driver offers to the archiver.
#[derive(Debug, Clone, Copy)]
pub struct DriverCapabilities {
    /// Listing the feature classes held by a container.
    pub enumerate: SupportStatus,
    /// Reading fields, spatial reference and records of a feature class.
    pub read: SupportStatus,
    /// Converting a feature class directly to structured markup.
    pub markup: SupportStatus,
}

impl DriverCapabilities {
    /// Returns `true` if at least one capability is implemented.
    #[must_use]
    pub fn has_any_support(&self) -> bool {
        self.enumerate.is_supported() || self.read.is_supported() || self.markup.is_supported()
    }

    /// Returns `true` when every capability needed for a full archive run is implemented.
    #[must_use]
    pub fn can_archive(&self) -> bool {
        self.enumerate.is_supported() && self.read.is_supported() && self.markup.is_supported()
    }
}

/// Source container driver definition.
#[derive(Debug, Clone)]
pub struct Driver {
    /// Short name used on the command line (e.g. `"GeoJSON"`).
    pub short_name: &'static str,
    /// Long descriptive name for display purposes.
    pub long_name: &'static str,
    /// What the driver can do.
    pub capabilities: DriverCapabilities,
}

impl Driver {
    /// Creates a new driver definition with specified capabilities.
    #[must_use]
    pub const fn new(
        short_name: &'static str,
        long_name: &'static str,
        enumerate: SupportStatus,
        read: SupportStatus,
        markup: SupportStatus,
    ) -> Self {
        Self {
            short_name,
            long_name,
            capabilities: DriverCapabilities {
                enumerate,
                read,
                markup,
            },
        }
    }
}
