//! Signal Bus Module
//!
//! Change and lifecycle notifications, fanned out to any number of subscribers.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::properties::{InterfaceMap, ObjectPath, PropertyMap};

// == Signal ==
/// A notification emitted by an object or the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal")]
pub enum Signal {
    /// One or more properties of an interface changed value
    PropertiesChanged {
        path: ObjectPath,
        interface: String,
        changed: PropertyMap,
        /// Always empty in this service
        invalidated: Vec<String>,
    },
    /// An object was registered, with its full property mapping
    InterfacesAdded {
        path: ObjectPath,
        interfaces: InterfaceMap,
    },
    /// An object was unregistered
    InterfacesRemoved {
        path: ObjectPath,
        interfaces: Vec<String>,
    },
    /// Legacy per-object announcement; emitted right after `InterfacesAdded`
    /// with an empty interface name.
    ObjectAdded { path: ObjectPath, interface: String },
}

impl Signal {
    /// Protocol member name of the signal.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::PropertiesChanged { .. } => "PropertiesChanged",
            Signal::InterfacesAdded { .. } => "InterfacesAdded",
            Signal::InterfacesRemoved { .. } => "InterfacesRemoved",
            Signal::ObjectAdded { .. } => "ObjectAdded",
        }
    }

    /// Object the signal concerns.
    pub fn path(&self) -> &ObjectPath {
        match self {
            Signal::PropertiesChanged { path, .. }
            | Signal::InterfacesAdded { path, .. }
            | Signal::InterfacesRemoved { path, .. }
            | Signal::ObjectAdded { path, .. } => path,
        }
    }
}

// == Signal Bus ==
/// Cloneable handle on a broadcast channel of signals.
///
/// Emission is synchronous and never blocks; with no subscribers the signal
/// is dropped.
#[derive(Debug, Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<Signal>,
}

impl SignalBus {
    /// Creates a bus buffering up to `capacity` signals per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a signal to every current subscriber.
    pub fn emit(&self, signal: Signal) {
        debug!(signal = signal.name(), path = %signal.path(), "emitting signal");
        // No receivers is not an error
        let _ = self.sender.send(signal);
    }

    /// Subscribes to all signals emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(256)
    }
}
