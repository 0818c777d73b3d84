//! Configuration validation.
//!
//! Serde handles the syntactic layer; this module performs the semantic
//! checks. Validation is a pure function over the whole config and reports
//! every violation, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic violation found in a config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Listener bind address does not parse as `host:port`.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// Metrics endpoint address does not parse as `host:port`.
    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    /// Outbound relay timeout must be non-zero.
    #[error("relay timeout must be greater than zero")]
    ZeroRelayTimeout,

    /// Inbound backstop timeout must exceed the relay timeout.
    #[error("request timeout ({request_secs}s) must exceed relay timeout ({relay_secs}s)")]
    RequestTimeoutTooTight { request_secs: u64, relay_secs: u64 },

    /// Body limit must be non-zero.
    #[error("max body size must be greater than zero")]
    ZeroBodyLimit,

    /// Unknown log level string.
    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validate a configuration, collecting all violations.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.relay.timeout_secs == 0 {
        errors.push(ValidationError::ZeroRelayTimeout);
    } else if config.timeouts.request_secs <= config.relay.timeout_secs {
        errors.push(ValidationError::RequestTimeoutTooTight {
            request_secs: config.timeouts.request_secs,
            relay_secs: config.relay.timeout_secs,
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    match config.observability.log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => errors.push(ValidationError::UnknownLogLevel(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
