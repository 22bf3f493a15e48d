//! API Routes
//!
//! Configures the Axum router with all property service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_object_handler, enumerate_handler, get_all_handler, get_property_handler,
    health_handler, managed_objects_handler, remove_object_handler, set_multiple_handler,
    set_property_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /objects` - All objects with all properties
/// - `POST /objects` - Create and register an object
/// - `DELETE /objects/*address` - Unregister an object
/// - `GET /enumerate` - All objects with interfaces flattened
/// - `POST /properties/get` - Read one property
/// - `POST /properties/get-all` - Read every property of an interface
/// - `PUT /properties/set` - Write one property
/// - `PUT /properties/set-multiple` - Write several properties at once
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/objects",
            get(managed_objects_handler).post(create_object_handler),
        )
        .route("/objects/*address", delete(remove_object_handler))
        .route("/enumerate", get(enumerate_handler))
        .route("/properties/get", post(get_property_handler))
        .route("/properties/get-all", post(get_all_handler))
        .route("/properties/set", put(set_property_handler))
        .route("/properties/set-multiple", put(set_multiple_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
