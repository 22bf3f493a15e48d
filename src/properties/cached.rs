//! Cached Property Store Module
//!
//! Persistence decorator over `PropertyStore` for a fixed set of interfaces.
//! The in-memory store stays authoritative; cache failures are logged and
//! never reach the caller.

use std::collections::BTreeSet;

use tracing::{error, info, warn};

use crate::error::Result;
use crate::properties::{
    validate_interface_name, InterfaceMap, ObjectPath, PropertyCache, PropertyMap,
    PropertyObject, PropertyStore, Value,
};
use crate::signals::SignalBus;

// == Cached Property Store ==
#[derive(Debug)]
pub struct CachedPropertyStore {
    inner: PropertyStore,
    cache: PropertyCache,
    cached_interfaces: BTreeSet<String>,
}

impl CachedPropertyStore {
    // == Constructor ==
    /// Creates the store and seeds every cacheable interface from its record.
    ///
    /// Each cacheable interface exists afterwards, empty if no usable record
    /// was found. Only malformed interface names fail construction.
    pub fn new<I, S>(path: ObjectPath, cached_interfaces: I, cache: PropertyCache) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cached_interfaces = cached_interfaces
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>();
        for interface in &cached_interfaces {
            validate_interface_name(interface)?;
        }

        let mut store = Self {
            inner: PropertyStore::new(path),
            cache,
            cached_interfaces,
        };
        store.load_all();
        Ok(store)
    }

    /// Returns true if `interface` is persisted.
    pub fn is_cached(&self, interface: &str) -> bool {
        self.cached_interfaces.contains(interface)
    }

    pub fn cached_interfaces(&self) -> impl Iterator<Item = &str> {
        self.cached_interfaces.iter().map(String::as_str)
    }

    // == Load ==
    fn load_all(&mut self) {
        for interface in &self.cached_interfaces {
            let properties = match self.cache.load(self.inner.path(), interface) {
                Ok(Some(properties)) => {
                    info!(
                        path = %self.inner.path(),
                        interface = %interface,
                        count = properties.len(),
                        "loaded properties from cache"
                    );
                    properties
                }
                Ok(None) => PropertyMap::new(),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable cache record");
                    PropertyMap::new()
                }
            };
            self.inner.seed(interface, properties);
        }
    }

    // == Persist ==
    fn persist(&self, interface: &str) {
        if !self.is_cached(interface) {
            return;
        }
        let Some(properties) = self.inner.properties().get(interface) else {
            return;
        };
        if let Err(e) = self.cache.save(self.inner.path(), interface, properties) {
            error!(error = %e, "failed to write cache record");
        }
    }
}

impl PropertyObject for CachedPropertyStore {
    fn path(&self) -> &ObjectPath {
        self.inner.path()
    }

    fn get(&self, interface: &str, property: &str) -> Result<Value> {
        self.inner.get(interface, property)
    }

    fn get_all(&self, interface: &str) -> Result<PropertyMap> {
        self.inner.get_all(interface)
    }

    fn set(&mut self, interface: &str, property: &str, value: Value) -> bool {
        let changed = self.inner.set(interface, property, value);
        self.persist(interface);
        changed
    }

    fn set_multiple(&mut self, interface: &str, properties: PropertyMap) -> PropertyMap {
        let changed = self.inner.set_multiple(interface, properties);
        self.persist(interface);
        changed
    }

    fn properties(&self) -> &InterfaceMap {
        self.inner.properties()
    }

    fn attach(&mut self, signals: SignalBus) {
        self.inner.attach(signals);
    }

    fn detach(&mut self) {
        self.inner.detach();
    }
}
