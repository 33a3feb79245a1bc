use tokio::signal;
use tracing::{error, warn};

/// Resolve once the process is asked to stop (Ctrl+C, or SIGTERM on unix).
///
/// A signal whose handler cannot be installed is logged and then ignored,
/// so the server keeps running and can still be stopped by the other one.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!(signal = "SIGINT", "Shutting down"),
        _ = terminate => warn!(signal = "SIGTERM", "Shutting down"),
    }
}
