//! API Handlers
//!
//! HTTP request handlers mapping the Get/Set and registry protocol onto JSON.

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{
    CreateObjectRequest, GetAllRequest, GetPropertyRequest, HealthResponse, MutationResponse,
    ObjectResponse, PropertyResponse, SetMultipleRequest, SetPropertyRequest,
};
use crate::properties::{
    CachedPropertyStore, InterfaceMap, ObjectPath, PropertyCache, PropertyMap, PropertyObject,
    PropertyStore,
};
use crate::registry::ObjectRegistry;
use crate::signals::SignalBus;

/// Application state shared across all handlers.
///
/// The registry sits behind one lock, which serializes every invocation
/// against object state and cache records.
#[derive(Clone)]
pub struct AppState {
    /// Live objects
    pub registry: Arc<RwLock<ObjectRegistry>>,
    /// Cache record location for cache-backed objects
    pub cache: PropertyCache,
}

impl AppState {
    /// Creates a new AppState around an existing registry.
    pub fn new(registry: ObjectRegistry, cache: PropertyCache) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let registry = ObjectRegistry::new(SignalBus::new(config.signal_capacity));
        Self::new(registry, PropertyCache::from_config(config))
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.registry.read().await;
    Json(HealthResponse::healthy(registry.len()))
}

/// Handler for GET /objects (GetManagedObjects)
pub async fn managed_objects_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<ObjectPath, InterfaceMap>> {
    let registry = state.registry.read().await;
    Json(registry.managed_objects())
}

/// Handler for GET /enumerate (Enumerate)
pub async fn enumerate_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<ObjectPath, PropertyMap>> {
    let registry = state.registry.read().await;
    Json(registry.enumerate())
}

/// Handler for POST /objects
///
/// Builds a plain or cache-backed object, fills in initial properties the
/// object does not already hold, and registers it.
pub async fn create_object_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateObjectRequest>,
) -> Result<Json<ObjectResponse>> {
    req.validate()?;
    let path = ObjectPath::parse(&req.address)?;

    let mut registry = state.registry.write().await;
    let interfaces = if req.cached_interfaces.is_empty() {
        let object = PropertyStore::new(path);
        register(&mut registry, &req.address, object, req.properties)?
    } else {
        let object = CachedPropertyStore::new(path, req.cached_interfaces, state.cache.clone())?;
        register(&mut registry, &req.address, object, req.properties)?
    };

    Ok(Json(ObjectResponse {
        address: req.address,
        interfaces,
    }))
}

fn register<O>(
    registry: &mut ObjectRegistry,
    address: &str,
    mut object: O,
    initial: InterfaceMap,
) -> Result<Vec<String>>
where
    O: PropertyObject + 'static,
{
    for (interface, properties) in initial {
        let missing: PropertyMap = properties
            .into_iter()
            .filter(|(name, _)| object.get(&interface, name).is_err())
            .collect();
        object.set_multiple(&interface, missing);
    }
    let interfaces = object.interfaces();
    registry.add(address, object)?;
    Ok(interfaces)
}

/// Handler for DELETE /objects/*address
pub async fn remove_object_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ObjectResponse>> {
    let address = format!("/{}", address.trim_start_matches('/'));

    let mut registry = state.registry.write().await;
    let object = registry
        .remove(&address)
        .ok_or_else(|| ServiceError::NotFound(address.clone()))?;

    Ok(Json(ObjectResponse {
        address,
        interfaces: object.interfaces(),
    }))
}

/// Handler for POST /properties/get (Get)
pub async fn get_property_handler(
    State(state): State<AppState>,
    Json(req): Json<GetPropertyRequest>,
) -> Result<Json<PropertyResponse>> {
    let registry = state.registry.read().await;
    let value = registry.get(&req.object)?.get(&req.interface, &req.property)?;

    Ok(Json(PropertyResponse {
        interface: req.interface,
        property: req.property,
        value,
    }))
}

/// Handler for POST /properties/get-all (GetAll)
pub async fn get_all_handler(
    State(state): State<AppState>,
    Json(req): Json<GetAllRequest>,
) -> Result<Json<PropertyMap>> {
    let registry = state.registry.read().await;
    let properties = registry.get(&req.object)?.get_all(&req.interface)?;
    Ok(Json(properties))
}

/// Handler for PUT /properties/set (Set)
pub async fn set_property_handler(
    State(state): State<AppState>,
    Json(req): Json<SetPropertyRequest>,
) -> Result<Json<MutationResponse>> {
    let mut registry = state.registry.write().await;
    let object = registry.get_mut(&req.object)?;

    let mut changed = PropertyMap::new();
    if object.set(&req.interface, &req.property, req.value.clone()) {
        changed.insert(req.property, req.value);
    }

    Ok(Json(MutationResponse {
        object: req.object,
        interface: req.interface,
        changed,
    }))
}

/// Handler for PUT /properties/set-multiple (SetMultiple)
pub async fn set_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<SetMultipleRequest>,
) -> Result<Json<MutationResponse>> {
    let mut registry = state.registry.write().await;
    let changed = registry
        .get_mut(&req.object)?
        .set_multiple(&req.interface, req.properties);

    Ok(Json(MutationResponse {
        object: req.object,
        interface: req.interface,
        changed,
    }))
}
