//! API Module
//!
//! HTTP handlers and routing for the property service.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET|POST /objects` - GetManagedObjects / create object
//! - `DELETE /objects/*address` - Remove object
//! - `GET /enumerate` - Flattened enumeration
//! - `POST /properties/get`, `POST /properties/get-all` - Get / GetAll
//! - `PUT /properties/set`, `PUT /properties/set-multiple` - Set / SetMultiple

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
