//! # Probe Server
//!
//! HTTP endpoints for liveness, readiness and Prometheus metrics.
//!
//! The server is only started after the bootstrap has published configuration,
//! so holding an [`ServerState`] implies the configuration is complete.

use crate::observability::metrics;
use crate::secrets::PublishedConfig;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state for probe handlers
#[derive(Debug)]
pub struct ServerState {
    /// Set once the listener is bound
    pub is_ready: AtomicBool,
    /// Configuration published by the bootstrap
    pub config: Arc<PublishedConfig>,
}

impl ServerState {
    pub fn new(config: Arc<PublishedConfig>) -> Self {
        Self {
            is_ready: AtomicBool::new(false),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadinessResponse {
    status: &'static str,
    published_entries: usize,
    published_at: String,
}

/// Build the probe router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `port` and serve probes until ctrl-c / SIGTERM
pub async fn start_server(port: u16, state: Arc<ServerState>) -> Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind probe server on {addr}"))?;

    state.is_ready.store(true, Ordering::Release);
    info!("Probe server listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Probe server terminated with an error")
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(state): State<Arc<ServerState>>) -> Response {
    if !state.is_ready.load(Ordering::Acquire) {
        return (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response();
    }
    Json(ReadinessResponse {
        status: "ready",
        published_entries: state.config.len(),
        published_at: state.config.published_at().to_rfc3339(),
    })
    .into_response()
}

async fn metrics_handler() -> Response {
    match metrics::gather_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to gather metrics: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, stopping probe server");
}
