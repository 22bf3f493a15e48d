//! Properties Module
//!
//! Per-object property storage, the disk cache overlay, and the addressing
//! and value types they share.

mod cached;
mod path;
mod record;
mod store;
mod value;


// Re-export public types
pub use cached::CachedPropertyStore;
pub use path::{validate_interface_name, ObjectPath, MAX_INTERFACE_LENGTH};
pub use record::{PropertyCache, RECORD_EXTENSION};
pub use store::{PropertyObject, PropertyStore};
pub use value::{InterfaceMap, PropertyMap, Value};
