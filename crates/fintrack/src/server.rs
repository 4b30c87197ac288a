//! HTTP server lifecycle.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::sheet::SheetBackend;
use crate::store;

/// Serve the API until Ctrl-C.
///
/// Missing sheets are created first. A backend that cannot be reached at
/// startup is logged and retried on each request.
///
/// # Errors
///
/// Returns an error if the address is invalid or cannot be bound.
pub async fn serve(config: &Config, backend: Arc<dyn SheetBackend>) -> Result<()> {
    info!("Using {}", backend.describe());
    if let Err(e) = store::ensure_sheets(backend.as_ref()).await {
        warn!("Could not prepare sheets: {e}");
    }

    let state = Arc::new(AppState::new(backend));
    let app = api::router(state, config.server.static_dir.as_deref());

    let listener = TcpListener::bind(config.bind_addr()?).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
