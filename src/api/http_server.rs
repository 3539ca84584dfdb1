// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::predict::predict_handler;
use crate::version::{FEATURES, VERSION_NUMBER};
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::signature::{DecisionThresholds, SignatureScorer};

/// Page served at `/`
const INDEX_HTML: &str = include_str!("index.html");

/// Room for multipart framing and base64 expansion on top of the image itself
const BODY_OVERHEAD: usize = 64 * 1024;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Model handle, loaded once at startup
    pub scorer: Arc<dyn SignatureScorer>,
    /// Accept/reject cut-offs
    pub thresholds: DecisionThresholds,
    /// Name reported by `/health`
    pub model_name: String,
}

impl AppState {
    pub fn new(
        scorer: Arc<dyn SignatureScorer>,
        thresholds: DecisionThresholds,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            scorer,
            thresholds,
            model_name: model_name.into(),
        }
    }
}

/// Request body limit: largest image after base64 inflation (4/3), plus framing
pub const BODY_LIMIT: usize = MAX_IMAGE_SIZE / 3 * 4 + BODY_OVERHEAD;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
    pub features: Vec<String>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Signature verifier listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model_name.clone(),
        version: VERSION_NUMBER.to_string(),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}
