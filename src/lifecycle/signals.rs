//! OS signal handling.

/// Resolve on Ctrl+C.
///
/// If the handler cannot be installed the server keeps running; it can still
/// be stopped through a [`Shutdown`](crate::lifecycle::Shutdown) coordinator.
pub async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}
