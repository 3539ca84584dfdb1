// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature authenticity scoring
//!
//! Components:
//! - `preprocessing` - bitmap to `[1, 224, 224, 3]` BGR tensor
//! - `model` - ONNX classifier producing a score in [0, 1]
//! - `decision` - score to Accept / Review / Reject

pub mod decision;
pub mod model;
pub mod preprocessing;

pub use decision::{
    format_confidence, Decision, DecisionThresholds, ThresholdError, Verdict, ACCEPT_THRESHOLD,
    REJECT_THRESHOLD,
};
pub use model::{OnnxSignatureModel, SignatureScorer};
pub use preprocessing::{
    preprocess_signature, PreprocessError, SignatureTensor, SIGNATURE_CHANNELS,
    SIGNATURE_INPUT_SIZE,
};

#[cfg(test)]
pub use model::MockSignatureScorer;
