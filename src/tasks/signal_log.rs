//! Signal Log Task
//!
//! Background task that drains a signal subscription into the log.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::signals::Signal;

/// Spawns a task that logs every signal received on `signals`.
///
/// The task ends when the bus is dropped. A subscriber that falls behind
/// logs how many signals it skipped and carries on.
///
/// # Example
/// ```ignore
/// let logger = spawn_signal_logger(registry.subscribe());
/// // Later, during shutdown:
/// logger.abort();
/// ```
pub fn spawn_signal_logger(mut signals: broadcast::Receiver<Signal>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting signal logger");

        loop {
            match signals.recv().await {
                Ok(signal) => {
                    let body = serde_json::to_string(&signal).unwrap_or_default();
                    info!(signal = signal.name(), path = %signal.path(), %body, "signal");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Signal logger lagged, skipped {} signals", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("Signal bus closed, stopping signal logger");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::ObjectPath;
    use crate::signals::SignalBus;
    use std::time::Duration;

    fn removed() -> Signal {
        Signal::InterfacesRemoved {
            path: ObjectPath::parse("/a").unwrap(),
            interfaces: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_logger_stops_when_bus_dropped() {
        let bus = SignalBus::new(4);
        let handle = spawn_signal_logger(bus.subscribe());

        bus.emit(removed());
        drop(bus);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("logger should stop once the bus is gone")
            .unwrap();
    }

    #[tokio::test]
    async fn test_logger_survives_lag() {
        let bus = SignalBus::new(1);
        let handle = spawn_signal_logger(bus.subscribe());

        for _ in 0..8 {
            bus.emit(removed());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "lagging must not stop the logger");

        handle.abort();
    }
}
