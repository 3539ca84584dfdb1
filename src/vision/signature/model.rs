// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signature authenticity classifier backed by ONNX Runtime

use anyhow::{Context, Result};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::preprocessing::{SignatureTensor, SIGNATURE_CHANNELS, SIGNATURE_INPUT_SIZE};

/// Anything that can turn a normalized signature tensor into an authenticity score
///
/// The handle is constructed once at startup and shared across requests, so
/// implementations must be safe to call concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait SignatureScorer: Send + Sync {
    /// Score a `[1, 224, 224, 3]` tensor; higher means more likely authentic
    fn score(&self, input: &SignatureTensor) -> Result<f32>;
}

/// Fixed set of interchangeable slots, each behind its own lock
///
/// `acquire` hands out the first free slot, so up to `len()` callers run in
/// parallel. Only when every slot is busy does a caller wait, and then on a
/// round-robin pick so waiters spread across slots.
pub struct SessionPool<T> {
    slots: Vec<Mutex<T>>,
    next: AtomicUsize,
}

impl<T> SessionPool<T> {
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            anyhow::bail!("Session pool needs at least one session");
        }
        Ok(Self {
            slots: items.into_iter().map(Mutex::new).collect(),
            next: AtomicUsize::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First slot that is free right now, if any
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, T>> {
        let start = self.next.fetch_add(1, Ordering::Relaxed);
        (0..self.slots.len())
            .map(|offset| &self.slots[(start + offset) % self.slots.len()])
            .find_map(|slot| slot.try_lock().ok())
    }

    pub fn acquire(&self) -> Result<MutexGuard<'_, T>> {
        if let Some(guard) = self.try_acquire() {
            return Ok(guard);
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        self.slots[index]
            .lock()
            .map_err(|_| anyhow::anyhow!("Signature model session lock poisoned"))
    }
}

/// Single-output binary classifier exported to ONNX (NHWC input, sigmoid output)
pub struct OnnxSignatureModel {
    /// ONNX Runtime sessions (run needs `&mut`)
    sessions: SessionPool<Session>,
    /// Model input name
    input_name: String,
}

impl std::fmt::Debug for OnnxSignatureModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSignatureModel")
            .field("input_name", &self.input_name)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl OnnxSignatureModel {
    /// Load the classifier from an `.onnx` file into `sessions` parallel sessions
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The file is not a valid ONNX graph
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        intra_threads: usize,
        sessions: usize,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Signature model not found: {}", model_path.display());
        }

        info!("Loading signature model from {}", model_path.display());

        let loaded = (0..sessions.max(1))
            .map(|_| load_session(model_path, intra_threads))
            .collect::<Result<Vec<_>>>()?;

        let input_name = loaded[0]
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());

        if let Some(input) = loaded[0].inputs.first() {
            debug!("Signature model input '{}': {:?}", input_name, input.input_type);
        }

        let sessions = SessionPool::new(loaded)?;

        info!(
            "✅ Signature model loaded (CPU, {} sessions, {} intra threads each)",
            sessions.len(),
            intra_threads
        );

        Ok(Self {
            sessions,
            input_name,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn load_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load signature model from {}",
            model_path.display()
        ))
}

impl SignatureScorer for OnnxSignatureModel {
    fn score(&self, input: &SignatureTensor) -> Result<f32> {
        let size = SIGNATURE_INPUT_SIZE as usize;
        if input.shape() != [1, size, size, SIGNATURE_CHANNELS] {
            anyhow::bail!(
                "Invalid input shape: {:?}, expected [1, {}, {}, {}]",
                input.shape(),
                size,
                size,
                SIGNATURE_CHANNELS
            );
        }

        let mut session = self.sessions.acquire()?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Signature inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let score = output_tensor
            .iter()
            .next()
            .copied()
            .context("Signature model returned an empty output")?;

        check_score(score)
    }
}

/// Reject non-finite scores and warn about scores outside [0, 1]
pub(crate) fn check_score(score: f32) -> Result<f32> {
    if !score.is_finite() {
        anyhow::bail!("Signature model returned a non-finite score: {}", score);
    }
    if !(0.0..=1.0).contains(&score) {
        warn!("Signature model score {} outside [0, 1], will be clamped", score);
    }
    Ok(score)
}
