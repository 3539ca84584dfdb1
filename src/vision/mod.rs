// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for signature verification
//!
//! This module provides:
//! - Image decoding from uploads and base64 data URLs
//! - Signature normalization, scoring and decision bands
//!
//! Inference runs on CPU only.

pub mod image_utils;
pub mod signature;

pub use image_utils::{
    decode_base64_image, decode_data_url, decode_image_bytes, detect_format, split_data_url,
    ImageError, ImageInfo,
};
pub use signature::{
    preprocess_signature, Decision, DecisionThresholds, OnnxSignatureModel, SignatureScorer,
    Verdict,
};
