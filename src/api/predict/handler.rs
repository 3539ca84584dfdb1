// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature prediction endpoint handler

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::header,
    Json,
};
use axum_extra::extract::Multipart;
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::{ImageSource, PredictRequest, FILE_FIELD};
use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::image_utils::{decode_data_url, decode_image_bytes};
use crate::vision::signature::{preprocess_signature, DecisionThresholds, SignatureScorer, Verdict};

/// POST /predict - Score a signature image
///
/// # Request
/// Exactly one of:
/// - multipart form with a `file` field holding image bytes
/// - JSON `{"image_data": "data:image/png;base64,<payload>"}`
///
/// # Response
/// - `decision`: "Accept", "Reject" or "Review"
/// - `confidence`: score as a percentage, e.g. "87.65%"
///
/// # Errors
/// - 400 Bad Request: no image supplied, empty upload, malformed data URL or
///   bytes that are not an image
/// - 500 Internal Server Error: preprocessing or inference failed
pub async fn predict_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();

    let source = extract_image_source(request, &state).await?;
    debug!("Prediction request received ({})", source.kind());

    let scorer = Arc::clone(&state.scorer);
    let thresholds = state.thresholds;
    let verdict = tokio::task::spawn_blocking(move || {
        score_source(scorer.as_ref(), &thresholds, &source)
    })
    .await
    .map_err(|e| {
        warn!("Prediction worker did not complete: {}", e);
        ApiError::InferenceFailed
    })??;

    info!(
        "Prediction complete: {} ({}), {}ms",
        verdict.decision,
        verdict.confidence,
        started.elapsed().as_millis()
    );

    Ok(Json(verdict.into()))
}

/// Pull the image out of either a multipart upload or a JSON drawing payload
pub async fn extract_image_source(
    request: Request,
    state: &AppState,
) -> Result<ImageSource, ApiError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, state).await.map_err(|e| {
            warn!("Rejected multipart body: {}", e);
            ApiError::InvalidInput("Invalid multipart body".to_string())
        })?;
        return read_upload(multipart).await;
    }

    let payload = match Json::<PredictRequest>::from_request(request, state).await {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => PredictRequest::default(),
        Err(rejection) => {
            warn!("Rejected JSON body: {}", rejection.body_text());
            return Err(ApiError::InvalidInput("Invalid request body".to_string()));
        }
    };

    payload
        .image_data
        .map(ImageSource::DataUrl)
        .ok_or_else(|| ApiError::MissingInput("No image data found".to_string()))
}

/// Find the `file` field; an empty file name or empty body counts as no selection
async fn read_upload(mut multipart: Multipart) -> Result<ImageSource, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Failed to read multipart field: {}", e);
        ApiError::InvalidInput("Invalid multipart body".to_string())
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read uploaded file: {}", e);
            ApiError::InvalidInput("Invalid multipart body".to_string())
        })?;

        if file_name.as_deref() == Some("") || bytes.is_empty() {
            return Err(ApiError::MissingInput("No selected file".to_string()));
        }

        return Ok(ImageSource::Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::MissingInput("No image data found".to_string()))
}

/// Decode the client bytes into a bitmap
pub fn decode_source(source: &ImageSource) -> Result<DynamicImage, ApiError> {
    match source {
        ImageSource::Upload { file_name, bytes } => {
            let (image, info) = decode_image_bytes(bytes).map_err(|e| {
                warn!("Failed to decode upload {:?}: {}", file_name, e);
                ApiError::InvalidInput("Invalid image file".to_string())
            })?;
            debug!(
                "Decoded upload: {}x{} {:?}, {} bytes",
                info.width, info.height, info.format, info.size_bytes
            );
            Ok(image)
        }
        ImageSource::DataUrl(data_url) => {
            let (image, info) = decode_data_url(data_url).map_err(|e| {
                warn!("Error decoding base64 image: {}", e);
                ApiError::InvalidInput("Invalid image data".to_string())
            })?;
            debug!(
                "Decoded drawing: {}x{} {:?}, {} bytes",
                info.width, info.height, info.format, info.size_bytes
            );
            Ok(image)
        }
    }
}

/// Decode, normalize, score and classify one image
pub fn score_source(
    scorer: &dyn SignatureScorer,
    thresholds: &DecisionThresholds,
    source: &ImageSource,
) -> Result<Verdict, ApiError> {
    let image = decode_source(source)?;

    let tensor = preprocess_signature(&image).map_err(|e| {
        warn!("Error in preprocessing: {}", e);
        ApiError::PreprocessingFailed
    })?;

    let score = scorer.score(&tensor).map_err(|e| {
        warn!("Signature inference failed: {:#}", e);
        ApiError::InferenceFailed
    })?;

    debug!("Signature score: {:.4}", score);

    Ok(thresholds.decide(score))
}
