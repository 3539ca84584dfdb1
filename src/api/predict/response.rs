// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response returned by POST /predict

use serde::{Deserialize, Serialize};

use crate::vision::signature::{Decision, Verdict};

/// `{"decision": "Accept", "confidence": "87.65%"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub decision: Decision,
    pub confidence: String,
}

impl From<Verdict> for PredictResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            decision: verdict.decision,
            confidence: verdict.confidence,
        }
    }
}
