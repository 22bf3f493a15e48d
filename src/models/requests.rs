//! Request DTOs for the property service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::Result;
use crate::properties::{validate_interface_name, InterfaceMap, PropertyMap, Value};

/// Request body for `POST /properties/get`
#[derive(Debug, Clone, Deserialize)]
pub struct GetPropertyRequest {
    /// Object address
    pub object: String,
    pub interface: String,
    pub property: String,
}

/// Request body for `POST /properties/get-all`
#[derive(Debug, Clone, Deserialize)]
pub struct GetAllRequest {
    /// Object address
    pub object: String,
    pub interface: String,
}

/// Request body for `PUT /properties/set`
#[derive(Debug, Clone, Deserialize)]
pub struct SetPropertyRequest {
    /// Object address
    pub object: String,
    pub interface: String,
    pub property: String,
    pub value: Value,
}

/// Request body for `PUT /properties/set-multiple`
#[derive(Debug, Clone, Deserialize)]
pub struct SetMultipleRequest {
    /// Object address
    pub object: String,
    pub interface: String,
    pub properties: PropertyMap,
}

/// Request body for `POST /objects`
///
/// # Fields
/// - `address`: object path to register
/// - `cached_interfaces`: interfaces persisted across restarts (plain object if empty)
/// - `properties`: initial values, applied before the object is registered
#[derive(Debug, Clone, Deserialize)]
pub struct CreateObjectRequest {
    pub address: String,
    #[serde(default)]
    pub cached_interfaces: Vec<String>,
    #[serde(default)]
    pub properties: InterfaceMap,
}

impl CreateObjectRequest {
    /// Checks every interface name in the request.
    pub fn validate(&self) -> Result<()> {
        self.cached_interfaces
            .iter()
            .chain(self.properties.keys())
            .try_for_each(|name| validate_interface_name(name))
    }
}
