//! Configuration Module
//!
//! Loads service configuration from environment variables. Values are read
//! once at process start and passed explicitly to the cache and registry.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Default directory holding cache records.
pub const DEFAULT_CACHE_DIR: &str = "/var/lib/obmc/inventory";

/// Which message bus scope the service is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusScope {
    /// Host-wide bus, reachable from other machines' tooling
    System,
    /// Per-user bus, local callers only
    Session,
}

impl BusScope {
    /// Parses `system` / `session` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "system" => Some(BusScope::System),
            "session" => Some(BusScope::Session),
            _ => None,
        }
    }

    /// Address the invocation surface binds to for this scope.
    pub fn bind_ip(&self) -> IpAddr {
        match self {
            BusScope::System => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            BusScope::Session => IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one record per (object, interface) pair
    pub cache_dir: PathBuf,
    /// Transport scope
    pub bus_scope: BusScope,
    /// HTTP server port
    pub server_port: u16,
    /// Rewrite empty arrays to empty strings when loading cache records
    pub legacy_empty_array: bool,
    /// Buffered signals per subscriber before it lags
    pub signal_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OBMC_CACHE_DIR` - Cache record directory (default: /var/lib/obmc/inventory)
    /// - `OBMC_BUS` - `system` or `session` (default: system)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `OBMC_LEGACY_EMPTY_ARRAY` - `true`/`false` (default: false)
    /// - `SIGNAL_CAPACITY` - Signal buffer per subscriber (default: 256)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("OBMC_CACHE_DIR")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            bus_scope: env::var("OBMC_BUS")
                .ok()
                .and_then(|v| BusScope::parse(&v))
                .unwrap_or(defaults.bus_scope),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            legacy_empty_array: env::var("OBMC_LEGACY_EMPTY_ARRAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.legacy_empty_array),
            signal_capacity: env::var("SIGNAL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.signal_capacity),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            bus_scope: BusScope::System,
            server_port: 3000,
            legacy_empty_array: false,
            signal_capacity: 256,
        }
    }
}
