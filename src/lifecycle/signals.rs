//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into the internal shutdown event so the server
//! drains in-flight relays instead of dropping them mid-stream.

use crate::lifecycle::Shutdown;

/// Wait for a termination signal, then trigger shutdown.
///
/// On Unix this listens for both Ctrl+C and SIGTERM (the latter is what
/// process supervisors send); elsewhere only Ctrl+C is available.
pub async fn listen_for_signals(shutdown: &Shutdown) {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }

    tracing::info!("Termination signal received");
    shutdown.trigger();
}
