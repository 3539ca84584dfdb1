// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the signature verifier

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version, reported by `/health` and logged at startup
pub const FEATURES: &[&str] = &["file-upload", "canvas-drawing", "onnx-cpu"];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Signature Verifier {}", VERSION_NUMBER)
}
