//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay handlers
//! - Wire up middleware (request ID, tracing, body limit, CORS, metrics)
//! - Serve the router over TLS only
//! - Stop gracefully when the shutdown signal fires

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::{LimitsConfig, RelayConfig};
use crate::http::middleware::cors_middleware;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::response::RelayError;
use crate::http::{health, status, upload};
use crate::observability::metrics;
use crate::printer::PrinterClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub printer: PrinterClient,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            printer: PrinterClient::new(&config.printer)?,
        })
    }
}

/// Build the relay router with all middleware layers.
///
/// The upload limit is enforced while the multipart body is read, so the
/// handler's `printerUrl` check still answers first.
pub fn build_router(state: AppState, limits: &LimitsConfig) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/status", get(status::status))
        .route("/upload", post(upload::upload))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

async fn not_found() -> RelayError {
    RelayError::NotFound
}

/// The HTTPS relay: one router, one certificate, one listener.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
    tls: RustlsConfig,
}

impl RelayServer {
    /// Create a relay with the given configuration and loaded certificate.
    pub fn new(config: RelayConfig, tls: RustlsConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(&config)?;
        let router = build_router(state, &config.limits);
        Ok(Self {
            router,
            config,
            tls,
        })
    }

    /// Serve TLS connections on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: std::net::TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        listener.set_nonblocking(true)?;

        tracing::info!(address = %addr, "Local HTTPS relay running at https://{}", addr);

        let handle = Handle::new();
        let grace = Duration::from_secs(self.config.listener.shutdown_grace_secs);
        let watcher = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!(grace_secs = grace.as_secs(), "Shutdown signal received, draining");
            watcher.graceful_shutdown(Some(grace));
        });

        axum_server::from_tcp_rustls(listener, self.tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS relay stopped");
        Ok(())
    }
}
