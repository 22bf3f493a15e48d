//! Response DTOs for the property service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::properties::{PropertyMap, Value};

/// Response body for `POST /properties/get`
#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub interface: String,
    pub property: String,
    pub value: Value,
}

/// Response body for `PUT /properties/set` and `PUT /properties/set-multiple`
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub object: String,
    pub interface: String,
    /// Properties whose stored value actually changed
    pub changed: PropertyMap,
}

/// Response body for `POST /objects` and `DELETE /objects/*address`
#[derive(Debug, Clone, Serialize)]
pub struct ObjectResponse {
    pub address: String,
    pub interfaces: Vec<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Number of live objects
    pub objects: usize,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(objects: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            objects,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Protocol fault name
    pub fault: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>, fault: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fault: fault.into(),
        }
    }
}
