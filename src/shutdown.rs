use tracing::{info, warn};

/// Resolves once the operator asks the process to stop (Ctrl-C).
///
/// If the signal handler cannot be installed the future never resolves and
/// the session ends only at end of input or on `:quit`.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}
