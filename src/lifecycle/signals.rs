//! OS signal handling.
//!
//! Ctrl+C (and SIGTERM on Unix) trigger the shutdown coordinator once.

use std::sync::Arc;

use crate::lifecycle::Shutdown;

async fn terminate() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    }
    #[cfg(not(unix))]
    std::future::pending::<()>().await;
}

/// Wait for an interrupt, then trigger `shutdown`.
pub async fn shutdown_on_signal(shutdown: Arc<Shutdown>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Ctrl+C received"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                terminate().await;
            }
        },
        _ = terminate() => tracing::info!("SIGTERM received"),
    }
    shutdown.trigger();
}
