//! Property Store Module
//!
//! Per-object interface/property storage with change detection.

use std::fmt;

use tracing::trace;

use crate::error::{Result, ServiceError};
use crate::properties::{InterfaceMap, ObjectPath, PropertyMap, Value};
use crate::signals::{Signal, SignalBus};

// == Property Object ==
/// Get/Set protocol shared by every registry-managed object.
pub trait PropertyObject: Send + Sync + fmt::Debug {
    /// The object's own address.
    fn path(&self) -> &ObjectPath;

    /// Reads one property.
    fn get(&self, interface: &str, property: &str) -> Result<Value>;

    /// Snapshot of every property of an interface.
    fn get_all(&self, interface: &str) -> Result<PropertyMap>;

    /// Stores a value, creating the interface if needed. Returns true when
    /// the stored value changed.
    fn set(&mut self, interface: &str, property: &str, value: Value) -> bool;

    /// Stores several values with one notification. Returns the changed subset.
    fn set_multiple(&mut self, interface: &str, properties: PropertyMap) -> PropertyMap;

    /// Full interface/property mapping.
    fn properties(&self) -> &InterfaceMap;

    /// Names of every interface the object exposes.
    fn interfaces(&self) -> Vec<String> {
        self.properties().keys().cloned().collect()
    }

    /// Starts publishing change notifications on `signals`.
    fn attach(&mut self, signals: SignalBus);

    /// Stops publishing change notifications.
    fn detach(&mut self);
}

// == Property Store ==
/// In-memory property mapping for one object.
#[derive(Debug)]
pub struct PropertyStore {
    /// Address used when publishing notifications
    path: ObjectPath,
    /// interface -> property -> value
    properties: InterfaceMap,
    /// Notification sink while attached
    signals: Option<SignalBus>,
}

impl PropertyStore {
    // == Constructor ==
    /// Creates an empty, detached store.
    pub fn new(path: ObjectPath) -> Self {
        Self {
            path,
            properties: InterfaceMap::new(),
            signals: None,
        }
    }

    /// Creates a store already publishing on `signals`.
    pub fn with_signals(path: ObjectPath, signals: SignalBus) -> Self {
        Self {
            signals: Some(signals),
            ..Self::new(path)
        }
    }

    /// Returns true while notifications are published.
    pub fn is_attached(&self) -> bool {
        self.signals.is_some()
    }

    // == Seed ==
    /// Merges `properties` into an interface without change detection or
    /// notification. The interface exists afterwards even if `properties`
    /// is empty.
    pub(crate) fn seed(&mut self, interface: &str, properties: PropertyMap) {
        self.properties
            .entry(interface.to_string())
            .or_default()
            .extend(properties);
    }

    // == Store If Changed ==
    /// Writes `value` when the property is absent or holds a different value.
    fn store_if_changed(map: &mut PropertyMap, property: &str, value: &Value) -> bool {
        match map.get(property) {
            Some(current) if current == value => false,
            _ => {
                map.insert(property.to_string(), value.clone());
                true
            }
        }
    }

    fn properties_changed(&self, interface: &str, changed: PropertyMap) {
        if let Some(signals) = &self.signals {
            signals.emit(Signal::PropertiesChanged {
                path: self.path.clone(),
                interface: interface.to_string(),
                changed,
                invalidated: Vec::new(),
            });
        }
    }
}

impl PropertyObject for PropertyStore {
    fn path(&self) -> &ObjectPath {
        &self.path
    }

    // == Get ==
    fn get(&self, interface: &str, property: &str) -> Result<Value> {
        self.properties
            .get(interface)
            .ok_or_else(|| ServiceError::UnknownInterface(interface.to_string()))?
            .get(property)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownProperty(property.to_string()))
    }

    // == Get All ==
    fn get_all(&self, interface: &str) -> Result<PropertyMap> {
        self.properties
            .get(interface)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownInterface(interface.to_string()))
    }

    // == Set ==
    fn set(&mut self, interface: &str, property: &str, value: Value) -> bool {
        let map = self.properties.entry(interface.to_string()).or_default();
        if !Self::store_if_changed(map, property, &value) {
            trace!(path = %self.path, interface, property, "value unchanged");
            return false;
        }

        let mut changed = PropertyMap::new();
        changed.insert(property.to_string(), value);
        self.properties_changed(interface, changed);
        true
    }

    // == Set Multiple ==
    fn set_multiple(&mut self, interface: &str, properties: PropertyMap) -> PropertyMap {
        let map = self.properties.entry(interface.to_string()).or_default();

        let changed: PropertyMap = properties
            .into_iter()
            .filter(|(property, value)| Self::store_if_changed(map, property, value))
            .collect();

        if !changed.is_empty() {
            self.properties_changed(interface, changed.clone());
        }
        changed
    }

    fn properties(&self) -> &InterfaceMap {
        &self.properties
    }

    fn attach(&mut self, signals: SignalBus) {
        self.signals = Some(signals);
    }

    fn detach(&mut self) {
        self.signals = None;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::{self, error::TryRecvError};

    const IFACE: &str = "org.openbmc.SensorValue";

    fn attached_store() -> (PropertyStore, broadcast::Receiver<Signal>) {
        let bus = SignalBus::new(16);
        let rx = bus.subscribe();
        let store = PropertyStore::with_signals(ObjectPath::parse("/org/sensor").unwrap(), bus);
        (store, rx)
    }

    fn changed_of(signal: Signal) -> (String, PropertyMap, Vec<String>) {
        match signal {
            Signal::PropertiesChanged {
                interface,
                changed,
                invalidated,
                ..
            } => (interface, changed, invalidated),
            other => panic!("unexpected signal {other:?}"),
        }
    }

    #[test]
    fn test_get_unknown_interface() {
        let store = PropertyStore::new(ObjectPath::parse("/a").unwrap());
        assert!(matches!(
            store.get(IFACE, "value"),
            Err(ServiceError::UnknownInterface(_))
        ));
        assert!(matches!(
            store.get_all(IFACE),
            Err(ServiceError::UnknownInterface(_))
        ));
    }

    #[test]
    fn test_get_unknown_property() {
        let (mut store, _rx) = attached_store();
        store.set(IFACE, "value", Value::Int(1));

        assert!(matches!(
            store.get(IFACE, "units"),
            Err(ServiceError::UnknownProperty(_))
        ));
    }

    #[test]
    fn test_set_new_property_notifies() {
        let (mut store, mut rx) = attached_store();

        assert!(store.set(IFACE, "value", Value::Int(42)));
        assert_eq!(store.get(IFACE, "value").unwrap(), Value::Int(42));

        let (interface, changed, invalidated) = changed_of(rx.try_recv().unwrap());
        assert_eq!(interface, IFACE);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed["value"], Value::Int(42));
        assert!(invalidated.is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_set_same_value_is_silent() {
        let (mut store, mut rx) = attached_store();
        store.set(IFACE, "value", Value::from("ok"));
        let _ = rx.try_recv();
        let before = store.get_all(IFACE).unwrap();

        assert!(!store.set(IFACE, "value", Value::from("ok")));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(store.get_all(IFACE).unwrap(), before);
    }

    #[test]
    fn test_set_different_kind_notifies() {
        let (mut store, mut rx) = attached_store();
        store.set(IFACE, "value", Value::Int(1));
        let _ = rx.try_recv();

        assert!(store.set(IFACE, "value", Value::Float(1.0)));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_set_multiple_single_notification_for_changed_subset() {
        let (mut store, mut rx) = attached_store();
        store.set(IFACE, "a", Value::Int(1));
        store.set(IFACE, "b", Value::Int(2));
        let _ = rx.try_recv();
        let _ = rx.try_recv();

        let mut batch = PropertyMap::new();
        batch.insert("a".to_string(), Value::Int(1));
        batch.insert("b".to_string(), Value::Int(3));
        let changed = store.set_multiple(IFACE, batch);

        assert_eq!(changed.len(), 1);
        assert_eq!(changed["b"], Value::Int(3));

        let (_, notified, _) = changed_of(rx.try_recv().unwrap());
        assert_eq!(notified, changed);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_set_multiple_nothing_changed() {
        let (mut store, mut rx) = attached_store();
        store.set(IFACE, "a", Value::Bool(true));
        let _ = rx.try_recv();

        let mut batch = PropertyMap::new();
        batch.insert("a".to_string(), Value::Bool(true));
        assert!(store.set_multiple(IFACE, batch).is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_set_multiple_empty_creates_interface() {
        let (mut store, mut rx) = attached_store();
        store.set_multiple(IFACE, PropertyMap::new());

        assert_eq!(store.get_all(IFACE).unwrap(), PropertyMap::new());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_get_all_is_snapshot() {
        let (mut store, _rx) = attached_store();
        store.set(IFACE, "a", Value::Int(1));

        let mut snapshot = store.get_all(IFACE).unwrap();
        snapshot.insert("b".to_string(), Value::Int(2));

        assert_eq!(store.get_all(IFACE).unwrap().len(), 1);
    }

    #[test]
    fn test_detached_store_is_silent() {
        let bus = SignalBus::new(16);
        let mut rx = bus.subscribe();
        let mut store =
            PropertyStore::with_signals(ObjectPath::parse("/org/sensor").unwrap(), bus.clone());
        store.detach();
        assert!(!store.is_attached());

        assert!(store.set(IFACE, "a", Value::Int(1)));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_seed_does_not_notify() {
        let (mut store, mut rx) = attached_store();
        let mut props = PropertyMap::new();
        props.insert("a".to_string(), Value::Int(7));
        store.seed(IFACE, props);
        store.seed("org.openbmc.Empty", PropertyMap::new());

        assert_eq!(store.get(IFACE, "a").unwrap(), Value::Int(7));
        assert!(store.get_all("org.openbmc.Empty").unwrap().is_empty());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_interfaces() {
        let (mut store, _rx) = attached_store();
        store.set("org.b.B", "x", Value::Int(1));
        store.set("org.a.A", "y", Value::Int(2));

        let mut names = store.interfaces();
        names.sort();
        assert_eq!(names, vec!["org.a.A".to_string(), "org.b.B".to_string()]);
    }
}
