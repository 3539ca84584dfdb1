// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

pub use api::{build_router, AppState};
pub use vision::signature::{Decision, DecisionThresholds, OnnxSignatureModel, SignatureScorer, Verdict};
