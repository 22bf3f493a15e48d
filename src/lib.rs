//! obmc_props - Property management for a remote-object service
//!
//! Per-object property stores with change notification, a disk-backed cache
//! overlay for selected interfaces, and the registry of live objects.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod properties;
pub mod registry;
pub mod signals;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use properties::{CachedPropertyStore, PropertyObject, PropertyStore, Value};
pub use registry::ObjectRegistry;
pub use signals::{Signal, SignalBus};
pub use tasks::spawn_signal_logger;
