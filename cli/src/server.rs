//! HTTP status API.
//!
//! Thin handlers over the core monitors: each endpoint collects fresh
//! data on request and serializes the model as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use labmon_core::models::{HostStatus, NvmeDeviceStatus, PingHostStatus, Report};
use labmon_core::{monitor, report, Settings};

/// Shared application state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/host/status", get(host_status))
        .route("/ping/status", get(ping_status))
        .route("/nvme/status", get(nvme_status))
        .route("/ports/report", get(ports_report))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn host_status() -> Json<HostStatus> {
    Json(monitor::host::host_status().await)
}

async fn ping_status(State(state): State<AppState>) -> Json<Vec<PingHostStatus>> {
    Json(monitor::ping::ping_status(&state.settings.ping_hosts).await)
}

/// 503 when nvme-cli is missing or its output cannot be parsed.
async fn nvme_status(
    State(state): State<AppState>,
) -> Result<Json<Vec<NvmeDeviceStatus>>, (StatusCode, String)> {
    monitor::nvme::nvme_status(&state.settings.nvme_devices)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
}

/// Build a fresh port-usage report per request.
async fn ports_report() -> Result<Json<Report>, (StatusCode, String)> {
    report::build_report()
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub async fn run(settings: Settings, addr: &str) -> Result<()> {
    let state = AppState {
        settings: Arc::new(settings),
    };
    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    info!(addr = %addr, "HTTP status server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
