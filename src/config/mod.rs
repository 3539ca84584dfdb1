// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Every setting can be given as a flag or an environment variable
//! (a `.env` file is loaded first by `main`).

use anyhow::{Context, Result};
use clap::Args;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::vision::signature::{DecisionThresholds, ACCEPT_THRESHOLD, REJECT_THRESHOLD};

/// Default location of the exported classifier
pub const DEFAULT_MODEL_PATH: &str = "./models/signature_verification.onnx";

/// Where to load the classifier from and how to run it
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Path to the ONNX signature classifier
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// ONNX Runtime intra-op thread count
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Number of ONNX sessions; this many predictions run in parallel
    #[arg(long, env = "ORT_SESSIONS", default_value_t = 2,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub sessions: u16,
}

impl ModelArgs {
    /// Short model name reported by `/health` (file stem of the model path)
    pub fn model_name(&self) -> String {
        model_name_from_path(&self.model_path)
    }
}

/// Decision band cut-offs
#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    /// Scores at or above this value are accepted
    #[arg(long, env = "ACCEPT_THRESHOLD", default_value_t = ACCEPT_THRESHOLD)]
    pub accept_threshold: f32,

    /// Scores below this value are rejected
    #[arg(long, env = "REJECT_THRESHOLD", default_value_t = REJECT_THRESHOLD)]
    pub reject_threshold: f32,
}

impl ThresholdArgs {
    pub fn thresholds(&self) -> Result<DecisionThresholds> {
        DecisionThresholds::new(self.accept_threshold, self.reject_threshold)
            .context("Invalid decision thresholds")
    }
}

/// HTTP listener settings
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Interface to bind
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 5000)]
    pub port: u16,
}

impl ServerArgs {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("signature-model")
        .to_string()
}
