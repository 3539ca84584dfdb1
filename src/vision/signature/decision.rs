// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mapping of classifier scores to Accept / Review / Reject bands

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scores at or above this value are accepted
pub const ACCEPT_THRESHOLD: f32 = 0.70;

/// Scores strictly below this value are rejected
pub const REJECT_THRESHOLD: f32 = 0.30;

/// Decision band for a scored signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Accept,
    Reject,
    Review,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "Accept",
            Decision::Reject => "Reject",
            Decision::Review => "Review",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision plus the score rendered as a percentage (e.g. "87.65%")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: Decision,
    pub confidence: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("threshold {name} = {value} is outside [0, 1]")]
    OutOfRange { name: &'static str, value: f32 },

    #[error("reject threshold {reject} must not exceed accept threshold {accept}")]
    Inverted { accept: f32, reject: f32 },
}

/// Accept/reject cut-offs, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThresholds {
    accept: f32,
    reject: f32,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            accept: ACCEPT_THRESHOLD,
            reject: REJECT_THRESHOLD,
        }
    }
}

impl DecisionThresholds {
    /// Validate a pair of thresholds: `0 <= reject <= accept <= 1`
    pub fn new(accept: f32, reject: f32) -> Result<Self, ThresholdError> {
        for (name, value) in [("accept", accept), ("reject", reject)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ThresholdError::OutOfRange { name, value });
            }
        }
        if reject > accept {
            return Err(ThresholdError::Inverted { accept, reject });
        }
        Ok(Self { accept, reject })
    }

    pub fn accept(&self) -> f32 {
        self.accept
    }

    pub fn reject(&self) -> f32 {
        self.reject
    }

    /// Classify a score. Accept is checked first, then Reject; everything
    /// else (including NaN) falls into Review.
    ///
    /// Finite scores are clamped to [0, 1] before classification and formatting.
    pub fn decide(&self, score: f32) -> Verdict {
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            score
        };

        let decision = if score >= self.accept {
            Decision::Accept
        } else if score < self.reject {
            Decision::Reject
        } else {
            Decision::Review
        };

        Verdict {
            decision,
            confidence: format_confidence(score),
        }
    }
}

/// Render a score in [0, 1] as a percentage with two decimals
pub fn format_confidence(score: f32) -> String {
    format!("{:.2}%", f64::from(score) * 100.0)
}
