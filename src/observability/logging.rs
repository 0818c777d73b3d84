//! Structured logging.
//!
//! Initializes the tracing subscriber once at startup. The `RUST_LOG`
//! environment variable wins over the configured level so a deployment can
//! raise verbosity without a config change.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::schema::ObservabilityConfig;

/// Initialize the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let default_filter = format!("relay_proxy={},tower_http=info", config.log_level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
