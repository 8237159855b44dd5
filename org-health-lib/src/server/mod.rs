//! HTTP front end
//!
//! Exposes the analysis pipeline over a small JSON API:
//!
//! - `GET /` reports that the service is up.
//! - `GET /analyze/{org}` runs an analysis and returns the report.
//! - `GET /results/{org}` returns the report stored by an earlier analysis.
//!
//! Each analysis request owns a cancellation token that fires when the request is
//! dropped, so a client disconnecting mid-fetch stops the pagination loop.

mod error;
mod handlers;

use crate::Result;
use crate::analysis::Analyzer;
use axum::Router;
use axum::routing::get;
use core::net::SocketAddr;
use ohno::IntoAppError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use error::ApiError;

const LOG_TARGET: &str = "    server";

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    #[must_use]
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Build the service's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/analyze/{org}", get(handlers::analyze))
        .route("/results/{org}", get(handlers::results))
        .with_state(state)
}

/// Serve on `addr` until `shutdown` is cancelled.
pub async fn serve(addr: SocketAddr, state: AppState, shutdown: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .into_app_err_with(|| format!("binding to {addr}"))?;

    let local = listener.local_addr().into_app_err("reading the listening address")?;
    log::info!(target: LOG_TARGET, "Listening on http://{local}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .into_app_err("running the HTTP server")?;

    log::info!(target: LOG_TARGET, "Server stopped");
    Ok(())
}
