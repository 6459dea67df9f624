//! Directory of `GeoJSON` files exposed as a source container.
//!
//! Each `.geojson`, `.json`, `.geojsonl` or `.geojsons` file inside the directory is one
//! feature class, named by its file stem. A `<stem>.prj` sidecar, when present, supplies
//! the spatial reference the way it does for shapefiles.
//!
//! The most recently parsed file is kept in memory until it changes on disk, so the
//! successive queries of one feature class parse it once.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use anyhow::{Context, Result};
use geoarchive_core_common::{
    FieldValue, GeoWorkspace, MarkupFormat, Record, RecordStream, SpatialReference,
};
use geoarchive_shared::{SourcePosition, SourceReadError, SourceResult};
use log::{debug, warn};

use crate::parser::{FeatureRecord, ParsedLayer, geometry_to_wkt, parse_geojson_bytes};
use crate::value::json_to_field_value;
use crate::writer::write_feature_collection;

/// Recognized feature class file extensions, highest priority first.
pub const FEATURE_CLASS_EXTENSIONS: [&str; 4] = ["geojson", "json", "geojsonl", "geojsons"];

/// WKT of WGS 84, the coordinate system `GeoJSON` coordinates are defined in.
pub const WGS84_WKT: &str = "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],AUTHORITY[\"EPSG\",\"6326\"]],PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],AUTHORITY[\"EPSG\",\"4326\"]]";

const WGS84_ALIASES: [&str; 4] = [
    "EPSG:4326",
    "urn:ogc:def:crs:OGC:1.3:CRS84",
    "urn:ogc:def:crs:EPSG::4326",
    "OGC:CRS84",
];

/// A directory holding one `GeoJSON` file per feature class.
#[derive(Debug)]
pub struct GeoJsonWorkspace {
    root: PathBuf,
    /// Feature class files found by the last directory listing.
    files: Mutex<BTreeMap<String, PathBuf>>,
    parsed: Mutex<Option<CachedLayer>>,
}

#[derive(Debug)]
struct CachedLayer {
    path: PathBuf,
    stamp: FileStamp,
    layer: Arc<ParsedLayer>,
}

/// Size and modification time, compared to detect a rewritten file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> SourceResult<Self> {
        let metadata = fs::metadata(path).map_err(|err| SourceReadError::io(err, path))?;
        Ok(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GeoJsonWorkspace {
    /// Open the directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a directory.
    pub fn open(path: impl Into<PathBuf>) -> SourceResult<Self> {
        let root = path.into();
        let metadata = fs::metadata(&root).map_err(|err| SourceReadError::io(err, &root))?;
        if !metadata.is_dir() {
            return Err(SourceReadError::io(
                std::io::Error::new(ErrorKind::InvalidInput, "source container is not a directory"),
                &root,
            ));
        }
        Ok(Self {
            root,
            files: Mutex::new(BTreeMap::new()),
            parsed: Mutex::new(None),
        })
    }

    /// Feature class name to file, lowest-priority duplicates dropped.
    fn layer_files(&self) -> SourceResult<BTreeMap<String, (usize, PathBuf)>> {
        let entries = fs::read_dir(&self.root).map_err(|err| SourceReadError::io(err, &self.root))?;
        let mut layers: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();

        for entry in entries {
            let path = entry
                .map_err(|err| SourceReadError::io(err, &self.root))?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(priority) = extension_priority(&path) else {
                continue;
            };
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!("Skipping file with a non UTF-8 name: {}", path.display());
                continue;
            };

            let shadowed =
                matches!(layers.get(name), Some((existing, _)) if *existing <= priority);
            if shadowed {
                debug!("Ignoring {} in favour of a higher priority file", path.display());
            } else {
                layers.insert(name.to_string(), (priority, path));
            }
        }

        Ok(layers)
    }

    /// List the directory again and remember what was found.
    fn refresh_files(&self) -> SourceResult<BTreeMap<String, PathBuf>> {
        let files: BTreeMap<String, PathBuf> = self
            .layer_files()?
            .into_iter()
            .map(|(name, (_, path))| (name, path))
            .collect();
        *lock(&self.files) = files.clone();
        Ok(files)
    }

    fn resolve(&self, feature_class: &str) -> SourceResult<PathBuf> {
        let known = lock(&self.files).get(feature_class).cloned();
        if let Some(path) = known.filter(|path| path.is_file()) {
            return Ok(path);
        }

        self.refresh_files()?
            .remove(feature_class)
            .ok_or_else(|| SourceReadError::FeatureClassNotFound {
                name: feature_class.to_string(),
                container: self.root.clone(),
            })
    }

    /// Parse every feature of a feature class.
    ///
    /// # Errors
    ///
    /// Returns an error if the feature class is missing, unreadable or not valid `GeoJSON`.
    pub fn read_layer(&self, feature_class: &str) -> SourceResult<Arc<ParsedLayer>> {
        let path = self.resolve(feature_class)?;
        self.load(&path)
    }

    fn load(&self, path: &Path) -> SourceResult<Arc<ParsedLayer>> {
        let stamp = FileStamp::of(path)?;
        let mut parsed = lock(&self.parsed);
        if let Some(cached) = parsed
            .as_ref()
            .filter(|cached| cached.path == path && cached.stamp == stamp)
        {
            return Ok(Arc::clone(&cached.layer));
        }

        let bytes = fs::read(path).map_err(|err| SourceReadError::io(err, path))?;
        let layer = Arc::new(parse_geojson_bytes(&bytes, path)?);
        debug!("Parsed {} feature(s) from {}", layer.features.len(), path.display());
        *parsed = Some(CachedLayer {
            path: path.to_path_buf(),
            stamp,
            layer: Arc::clone(&layer),
        });
        Ok(layer)
    }

    /// `<feature_class>.prj` next to the layer file, extension matched in any case.
    fn sidecar_path(&self, feature_class: &str) -> SourceResult<Option<PathBuf>> {
        let exact = self.root.join(format!("{feature_class}.prj"));
        if exact.is_file() {
            return Ok(Some(exact));
        }

        let entries = fs::read_dir(&self.root).map_err(|err| SourceReadError::io(err, &self.root))?;
        for entry in entries {
            let path = entry
                .map_err(|err| SourceReadError::io(err, &self.root))?
                .path();
            let is_sidecar = path.file_stem().is_some_and(|stem| stem == feature_class)
                && path
                    .extension()
                    .is_some_and(|extension| extension.eq_ignore_ascii_case("prj"));
            if is_sidecar && path.is_file() {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn sidecar_projection(&self, feature_class: &str) -> SourceResult<Option<String>> {
        let Some(prj) = self.sidecar_path(feature_class)? else {
            return Ok(None);
        };
        let text = fs::read_to_string(&prj).map_err(|err| SourceReadError::io(err, &prj))?;
        Ok(Some(text.trim().to_string()))
    }
}

fn extension_priority(path: &Path) -> Option<usize> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    FEATURE_CLASS_EXTENSIONS
        .iter()
        .position(|candidate| *candidate == extension)
}

/// Name of the outermost WKT node, e.g. `GCS_WGS_1984` for `GEOGCS["GCS_WGS_1984",...]`.
fn wkt_name(definition: &str) -> Option<String> {
    let start = definition.find("[\"")? + 2;
    let len = definition[start..].find('"')?;
    Some(definition[start..start + len].to_string())
}

fn spatial_reference_from_name(name: &str) -> SpatialReference {
    if WGS84_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(name))
    {
        SpatialReference::new(Some(name.to_string()), WGS84_WKT)
    } else {
        SpatialReference::new(Some(name.to_string()), name)
    }
}

fn feature_to_record(
    index: usize,
    feature: &FeatureRecord,
    fields: &[String],
) -> SourceResult<Record> {
    let geometry_wkt = feature
        .geometry
        .as_ref()
        .map(geometry_to_wkt)
        .transpose()
        .map_err(|err| match err {
            SourceReadError::Geometry { message, context, .. } => SourceReadError::Geometry {
                message,
                position: Some(SourcePosition::feature(index as u64 + 1)),
                context,
            },
            other => other,
        })?;

    let values = fields
        .iter()
        .map(|field| {
            feature
                .properties
                .get(field)
                .map_or(FieldValue::Null, json_to_field_value)
        })
        .collect();

    Ok(Record::new(geometry_wkt, values))
}

impl GeoWorkspace for GeoJsonWorkspace {
    fn path(&self) -> &Path {
        &self.root
    }

    fn feature_classes(&self) -> Result<Vec<String>> {
        let names: Vec<String> = self.refresh_files()?.into_keys().collect();
        debug!(
            "Found {} feature class(es) in {}",
            names.len(),
            self.root.display()
        );
        Ok(names)
    }

    fn field_names(&self, feature_class: &str) -> Result<Vec<String>> {
        Ok(self.read_layer(feature_class)?.field_names())
    }

    fn spatial_reference(&self, feature_class: &str) -> Result<SpatialReference> {
        if let Some(definition) = self.sidecar_projection(feature_class)? {
            return Ok(SpatialReference::new(wkt_name(&definition), definition));
        }

        let layer = self.read_layer(feature_class)?;
        Ok(match layer.crs_name() {
            Some(name) => spatial_reference_from_name(name),
            None => SpatialReference::new(Some("EPSG:4326".to_string()), WGS84_WKT),
        })
    }

    fn records<'a>(&'a self, feature_class: &str, fields: &[String]) -> Result<RecordStream<'a>> {
        let path = self.resolve(feature_class)?;
        let layer = self.load(&path)?;
        let fields = fields.to_vec();

        Ok(Box::new((0..layer.features.len()).map(move |index| {
            feature_to_record(index, &layer.features[index], &fields)
                .map_err(|err| anyhow::Error::from(err.with_path(&path)))
        })))
    }

    fn export_markup(
        &self,
        feature_class: &str,
        destination: &Path,
        format: MarkupFormat,
    ) -> Result<u64> {
        let layer = self.read_layer(feature_class)?;

        let file = File::create(destination)
            .with_context(|| format!("Failed to create '{}'", destination.display()))?;
        let mut writer = BufWriter::new(file);
        write_feature_collection(&mut writer, &layer, format)
            .with_context(|| format!("Failed to write GeoJSON file '{}'", destination.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush '{}'", destination.display()))?;
        writer
            .get_ref()
            .sync_all()
            .with_context(|| format!("Failed to sync '{}'", destination.display()))?;

        Ok(layer.features.len() as u64)
    }
}
