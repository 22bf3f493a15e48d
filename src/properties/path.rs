//! Object Addressing Module
//!
//! Validated object paths and interface names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Maximum interface name length in bytes
pub const MAX_INTERFACE_LENGTH: usize = 255;

// == Object Path ==
/// Hierarchical object address such as `/org/openbmc/inventory/system`.
///
/// Elements are non-empty runs of `[A-Za-z0-9_]`. The root path is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    // == Parse ==
    /// Validates and wraps an object address.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || ServiceError::InvalidAddress(address.to_string());

        let rest = address.strip_prefix('/').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Ok(Self(address.to_string()));
        }

        let valid = rest.split('/').all(|element| {
            !element.is_empty()
                && element
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        });

        if valid {
            Ok(Self(address.to_string()))
        } else {
            Err(invalid())
        }
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // == Flat Name ==
    /// Filesystem-safe form of the address: leading `/` dropped, remaining
    /// separators replaced by `.`.
    ///
    /// `.` never appears in a valid element, so distinct paths give distinct names.
    pub fn flat_name(&self) -> String {
        self.0[1..].replace('/', ".")
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectPath {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

// == Interface Names ==
/// Checks a dotted interface name such as `org.openbmc.InventoryItem`.
///
/// At least two elements; each starts with a letter or `_` and continues
/// with `[A-Za-z0-9_]`.
pub fn validate_interface_name(name: &str) -> Result<()> {
    let invalid = || ServiceError::InvalidInterface(name.to_string());

    if name.is_empty() || name.len() > MAX_INTERFACE_LENGTH {
        return Err(invalid());
    }

    let mut count = 0;
    for element in name.split('.') {
        let mut bytes = element.bytes();
        match bytes.next() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
            _ => return Err(invalid()),
        }
        if !bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(invalid());
        }
        count += 1;
    }

    if count < 2 {
        return Err(invalid());
    }
    Ok(())
}
