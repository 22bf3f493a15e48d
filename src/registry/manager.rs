//! Object Registry Module
//!
//! Table of live objects keyed by address, with add/remove notifications and
//! bulk query views.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::properties::{InterfaceMap, ObjectPath, PropertyMap, PropertyObject};
use crate::signals::{Signal, SignalBus};

// == Object Registry ==
#[derive(Debug)]
pub struct ObjectRegistry {
    /// address -> live object
    objects: HashMap<ObjectPath, Box<dyn PropertyObject>>,
    /// Bus shared by the registry and every attached object
    signals: SignalBus,
}

impl ObjectRegistry {
    // == Constructor ==
    pub fn new(signals: SignalBus) -> Self {
        Self {
            objects: HashMap::new(),
            signals,
        }
    }

    /// Handle on the bus objects publish to.
    pub fn signals(&self) -> &SignalBus {
        &self.signals
    }

    /// Subscribes to every registry and object signal.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.signals.subscribe()
    }

    // == Add ==
    /// Registers `object` under `address`, replacing any previous occupant.
    ///
    /// Emits `InterfacesAdded` with the object's full mapping, then the
    /// legacy `ObjectAdded`.
    pub fn add<O>(&mut self, address: &str, object: O) -> Result<()>
    where
        O: PropertyObject + 'static,
    {
        let path = ObjectPath::parse(address)?;
        if object.path() != &path {
            return Err(ServiceError::AddressMismatch {
                address: address.to_string(),
                path: object.path().to_string(),
            });
        }

        let mut object: Box<dyn PropertyObject> = Box::new(object);
        object.attach(self.signals.clone());
        let interfaces = object.properties().clone();

        if let Some(mut previous) = self.objects.insert(path.clone(), object) {
            warn!(path = %path, "replacing existing object");
            previous.detach();
        }
        info!(path = %path, interfaces = interfaces.len(), "object added");

        self.signals.emit(Signal::InterfacesAdded {
            path: path.clone(),
            interfaces,
        });
        self.signals.emit(Signal::ObjectAdded {
            path,
            interface: String::new(),
        });
        Ok(())
    }

    // == Remove ==
    /// Unregisters and returns the object at `address`.
    ///
    /// Returns `None` without emitting anything when no object is there.
    pub fn remove(&mut self, address: &str) -> Option<Box<dyn PropertyObject>> {
        let path = ObjectPath::parse(address).ok()?;
        let Some(mut object) = self.objects.remove(&path) else {
            warn!(path = %path, "remove: no such object");
            return None;
        };

        object.detach();
        let interfaces = object.interfaces();
        info!(path = %path, "object removed");

        self.signals.emit(Signal::InterfacesRemoved { path, interfaces });
        Some(object)
    }

    // == Get ==
    pub fn get(&self, address: &str) -> Result<&dyn PropertyObject> {
        let path = ObjectPath::parse(address)?;
        let object: &dyn PropertyObject = self
            .objects
            .get(&path)
            .ok_or_else(|| ServiceError::NotFound(address.to_string()))?
            .as_ref();
        Ok(object)
    }

    pub fn get_mut(&mut self, address: &str) -> Result<&mut dyn PropertyObject> {
        let path = ObjectPath::parse(address)?;
        let object: &mut dyn PropertyObject = self
            .objects
            .get_mut(&path)
            .ok_or_else(|| ServiceError::NotFound(address.to_string()))?
            .as_mut();
        Ok(object)
    }

    // == Managed Objects ==
    /// Snapshot of every object's full interface/property mapping.
    pub fn managed_objects(&self) -> BTreeMap<ObjectPath, InterfaceMap> {
        self.objects
            .iter()
            .map(|(path, object)| (path.clone(), object.properties().clone()))
            .collect()
    }

    // == Enumerate ==
    /// Every object's properties merged across interfaces.
    ///
    /// When two interfaces share a property name only one value survives.
    /// Which one is unspecified; callers must not rely on it.
    pub fn enumerate(&self) -> BTreeMap<ObjectPath, PropertyMap> {
        self.objects
            .iter()
            .map(|(path, object)| {
                let flat = object
                    .properties()
                    .values()
                    .flat_map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())))
                    .collect();
                (path.clone(), flat)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new(SignalBus::default())
    }
}
