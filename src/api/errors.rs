// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of every non-200 response: `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Neither an upload nor a drawing was supplied
    MissingInput(String),
    /// The supplied bytes could not be turned into an image
    InvalidInput(String),
    /// Normalization failed; detail is logged, not returned
    PreprocessingFailed,
    /// The model call failed; detail is logged, not returned
    InferenceFailed,
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            ApiError::MissingInput(msg) | ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::PreprocessingFailed => "Error processing image".to_string(),
            ApiError::InferenceFailed => "Error running model".to_string(),
        };
        ErrorResponse { error }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PreprocessingFailed | ApiError::InferenceFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingInput(msg) => write!(f, "Missing input: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::PreprocessingFailed => write!(f, "Preprocessing failed"),
            ApiError::InferenceFailed => write!(f, "Inference failed"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
