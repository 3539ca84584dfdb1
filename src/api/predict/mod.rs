// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature prediction endpoint module
//!
//! Provides POST /predict for scoring uploaded or drawn signatures.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{predict_handler, score_source};
pub use request::{ImageSource, PredictRequest};
pub use response::PredictResponse;
