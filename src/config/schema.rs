//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so a minimal (or absent) config file works.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Relay behavior: outbound timeout and redirect policy.
    pub relay: RelayConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Timeout configuration for the inbound side.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Relay configuration for the outbound leg.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Total outbound timeout in seconds, covering connect, send, and the
    /// response exchange. A single attempt is made per inbound request.
    pub timeout_secs: u64,

    /// Maximum redirect hops followed transparently.
    pub max_redirects: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_redirects: 5,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes. Enforced by middleware before
    /// the relay handler captures the body.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Timeout configuration for inbound request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backstop timeout for the whole inbound request in seconds. Must be
    /// wider than `relay.timeout_secs` so the relay error mapping, not this
    /// layer, decides the response for a slow origin.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
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
