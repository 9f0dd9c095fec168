//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the mirror redirector.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the mirror list lives and how to fetch it.
    pub mirrors: MirrorListConfig,

    /// Probe race settings.
    pub race: RaceConfig,

    /// Timeout configuration for the HTTP surface.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Mirror list source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MirrorListConfig {
    /// URL of the newline-delimited mirror list (`http`, `https` or `file`).
    /// Required; empty means unset.
    pub list_url: String,

    /// Timeout for fetching the list, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for MirrorListConfig {
    fn default() -> Self {
        Self {
            list_url: String::new(),
            fetch_timeout_secs: 5,
        }
    }
}

/// Probe race configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Deadline for the whole race, in seconds.
    pub timeout_secs: u64,

    /// Upper bound on probes in flight across all requests.
    pub max_in_flight_probes: usize,

    /// TCP connect timeout for a single probe, in seconds.
    pub connect_timeout_secs: u64,

    /// User agent sent with every probe.
    pub user_agent: String,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_in_flight_probes: 1024,
            connect_timeout_secs: 5,
            user_agent: concat!("mirror-redirect/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to answer a client) in seconds.
    /// Must exceed the list fetch timeout plus the race deadline.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
