//! Registry Module
//!
//! Process-wide table of live objects.

mod manager;

pub use manager::ObjectRegistry;
