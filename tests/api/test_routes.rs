// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests for the signature verifier router

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use signature_verifier::version::FEATURES;
use signature_verifier::{api::HealthResponse, build_router, AppState, DecisionThresholds, SignatureScorer};
use std::sync::Arc;
use tower::ServiceExt;

struct NeverCalled;

impl SignatureScorer for NeverCalled {
    fn score(&self, _input: &ndarray::Array4<f32>) -> anyhow::Result<f32> {
        panic!("scorer must not be called by this route")
    }
}

fn app() -> axum::Router {
    build_router(AppState::new(
        Arc::new(NeverCalled),
        DecisionThresholds::default(),
        "signature_verification",
    ))
}

#[tokio::test]
async fn test_index_page_is_served() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/predict"));
    assert!(html.contains("image_data"));
}

#[tokio::test]
async fn test_health_reports_model() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.model, "signature_verification");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.features, FEATURES);
    assert!(health.features.iter().any(|f| f == "canvas-drawing"));
}

#[tokio::test]
async fn test_predict_rejects_get() {
    let response = app()
        .oneshot(Request::builder().uri("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app()
        .oneshot(Request::builder().uri("/v1/ocr").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
