//! Error types for the property service
//!
//! Caller-facing faults use `ServiceError`. Cache record failures use
//! `CacheRecordError` and never leave the cache overlay.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Service Error Enum ==
/// Faults surfaced to the invoking layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Get/GetAll against an interface never initialized on the object
    #[error("Unknown interface: {0}")]
    UnknownInterface(String),

    /// Get against an initialized interface lacking the property
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// No live object at the address
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Malformed object address
    #[error("Invalid object address: {0}")]
    InvalidAddress(String),

    /// Malformed interface name
    #[error("Invalid interface name: {0}")]
    InvalidInterface(String),

    /// Registry address differs from the object's own path
    #[error("Address {address} does not match object path {path}")]
    AddressMismatch { address: String, path: String },
}

impl ServiceError {
    /// Protocol-level fault name for this error.
    pub fn fault_name(&self) -> &'static str {
        match self {
            ServiceError::UnknownInterface(_) => "org.freedesktop.DBus.Error.UnknownInterface",
            ServiceError::UnknownProperty(_) => "org.freedesktop.DBus.Error.UnknownProperty",
            ServiceError::NotFound(_) => "org.freedesktop.DBus.Error.UnknownObject",
            ServiceError::InvalidAddress(_)
            | ServiceError::InvalidInterface(_)
            | ServiceError::AddressMismatch { .. } => "org.freedesktop.DBus.Error.InvalidArgs",
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::UnknownInterface(_)
            | ServiceError::UnknownProperty(_)
            | ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidAddress(_)
            | ServiceError::InvalidInterface(_)
            | ServiceError::AddressMismatch { .. } => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string(), self.fault_name()));

        (status, body).into_response()
    }
}

// == Cache Record Error ==
/// Failure while reading or writing a cache record.
#[derive(Error, Debug)]
pub enum CacheRecordError {
    #[error("cache record I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache record encode failed for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache record decode failed for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the property service.
pub type Result<T> = std::result::Result<T, ServiceError>;
