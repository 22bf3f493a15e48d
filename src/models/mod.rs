//! Request and Response models for the property service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    CreateObjectRequest, GetAllRequest, GetPropertyRequest, SetMultipleRequest,
    SetPropertyRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, MutationResponse, ObjectResponse, PropertyResponse,
};
