//! Cache Record Module
//!
//! One JSON file per (object, interface) pair holding that interface's
//! property map.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::CacheRecordError;
use crate::properties::{ObjectPath, PropertyMap, Value};

/// File extension of cache records
pub const RECORD_EXTENSION: &str = "props";

// == Property Cache ==
/// Reads and writes cache records under a root directory.
#[derive(Debug, Clone)]
pub struct PropertyCache {
    /// Directory holding the records
    root: PathBuf,
    /// Load empty arrays as empty strings
    legacy_empty_array: bool,
}

impl PropertyCache {
    // == Constructor ==
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            legacy_empty_array: false,
        }
    }

    /// Creates a cache from the service configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cache_dir).with_legacy_empty_array(config.legacy_empty_array)
    }

    /// Enables rewriting top-level empty arrays to empty strings on load,
    /// for transports that cannot carry an untyped empty array.
    pub fn with_legacy_empty_array(mut self, enabled: bool) -> Self {
        self.legacy_empty_array = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Record Path ==
    /// `<root>/<flat object path>@<interface>.props`
    pub fn record_path(&self, path: &ObjectPath, interface: &str) -> PathBuf {
        self.root.join(format!(
            "{}@{}.{}",
            path.flat_name(),
            interface,
            RECORD_EXTENSION
        ))
    }

    // == Load ==
    /// Reads a record. A missing record yields `Ok(None)`.
    pub fn load(
        &self,
        path: &ObjectPath,
        interface: &str,
    ) -> Result<Option<PropertyMap>, CacheRecordError> {
        let file = self.record_path(path, interface);
        let record = file.display().to_string();

        let bytes = match fs::read(&file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheRecordError::Io {
                    path: record,
                    source,
                })
            }
        };

        let mut properties: PropertyMap =
            serde_json::from_slice(&bytes).map_err(|source| CacheRecordError::Decode {
                path: record,
                source,
            })?;

        if self.legacy_empty_array {
            for value in properties.values_mut() {
                if value.is_empty_array() {
                    *value = Value::Str(String::new());
                }
            }
        }

        Ok(Some(properties))
    }

    // == Save ==
    /// Overwrites the record with the full property map of the interface.
    pub fn save(
        &self,
        path: &ObjectPath,
        interface: &str,
        properties: &PropertyMap,
    ) -> Result<(), CacheRecordError> {
        let file = self.record_path(path, interface);
        let record = file.display().to_string();

        let encoded =
            serde_json::to_vec_pretty(properties).map_err(|source| CacheRecordError::Encode {
                path: record.clone(),
                source,
            })?;

        fs::create_dir_all(&self.root)
            .and_then(|_| fs::write(&file, encoded))
            .map_err(|source| CacheRecordError::Io {
                path: record.clone(),
                source,
            })?;

        debug!(record = %record, count = properties.len(), "cache record written");
        Ok(())
    }
}
