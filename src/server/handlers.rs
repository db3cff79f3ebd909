//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::AppState;
use crate::transformer::CONTENT_TYPE;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Monit Exporter</title>
</head>
<body>
    <h1>Monit Exporter</h1>
    <p>Version: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="{}">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.config.server.metrics_path
    );
    Html(html)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics endpoint - polls Monit and returns Prometheus format
///
/// Always answers 200; an unreachable or failing Monit shows up as
/// `monit_up 0`.
#[instrument(skip(state), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.exporter.collect().await;
    let output = state.exporter.render(&snapshot);

    debug!(
        up = snapshot.up,
        series = snapshot.metrics.len(),
        bytes = output.len(),
        "Metrics rendered"
    );

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], output)
}
