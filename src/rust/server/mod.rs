pub mod backend;
mod error;
pub mod model_server;
mod pages;
pub mod ui;

use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;

pub use backend::{AnalysisResult, AnalyzeError, BackendClient, BackendProtocol};
pub use error::ApiError;
pub use ui::UiState;

/// Serves `router` on `address` until Ctrl-C.
pub async fn serve(router: Router, address: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
