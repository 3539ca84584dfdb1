// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{predict::score_source, start_server, AppState, ImageSource, PredictResponse};
use crate::config::{ModelArgs, ServerArgs, ThresholdArgs};
use crate::version::{get_version_string, FEATURES};
use crate::vision::signature::OnnxSignatureModel;

/// Signature authenticity verification service
#[derive(Parser, Debug)]
#[command(name = "signature-verifier")]
#[command(version)]
#[command(about = "Score signature images as Accept / Review / Reject", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Serve settings used when no subcommand is given
    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service (default)
    Serve(ServeArgs),

    /// Score a single image file and print the verdict as JSON
    Score(ScoreArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Arguments for the score command
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Image file to score
    pub image: PathBuf,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Execute CLI command; no subcommand means `serve` with settings from the environment
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await,
        Some(Commands::Score(args)) => score(args).await,
        None => serve(cli.serve).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    info!("{}", get_version_string());
    info!("Features: {}", FEATURES.join(", "));

    let thresholds = args.thresholds.thresholds()?;
    let addr = args.server.bind_addr()?;
    let model = load_model(&args.model).await?;

    info!(
        "Model '{}' ready: input '{}', {} parallel sessions",
        args.model.model_name(),
        model.input_name(),
        model.session_count()
    );
    info!(
        "Decision thresholds: accept >= {:.2}, reject < {:.2}",
        thresholds.accept(),
        thresholds.reject()
    );

    let state = AppState::new(model, thresholds, args.model.model_name());
    start_server(state, addr).await
}

async fn score(args: ScoreArgs) -> Result<()> {
    let thresholds = args.thresholds.thresholds()?;

    let bytes = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    let source = ImageSource::Upload {
        file_name: args
            .image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        bytes,
    };

    let model = load_model(&args.model).await?;
    let verdict = tokio::task::spawn_blocking(move || {
        score_source(model.as_ref(), &thresholds, &source)
    })
    .await??;

    let response = PredictResponse::from(verdict);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Load the ONNX session off the async runtime
async fn load_model(args: &ModelArgs) -> Result<Arc<OnnxSignatureModel>> {
    let path = args.model_path.clone();
    let intra_threads = args.intra_threads;
    let sessions = usize::from(args.sessions);
    let model = tokio::task::spawn_blocking(move || {
        OnnxSignatureModel::new(path, intra_threads, sessions)
    })
        .await
        .context("Model loading task failed")??;
    Ok(Arc::new(model))
}
