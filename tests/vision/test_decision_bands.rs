// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Decision band tests: every score in [0, 1] lands in exactly one band.
//! Accept is inclusive at its threshold; Reject is strict at its threshold.

use signature_verifier::vision::signature::{
    Decision, DecisionThresholds, ACCEPT_THRESHOLD, REJECT_THRESHOLD,
};

#[test]
fn test_sweep_matches_bands() {
    let thresholds = DecisionThresholds::default();

    for step in 0..=1000u32 {
        let score = step as f32 / 1000.0;
        let verdict = thresholds.decide(score);

        let expected = if score >= ACCEPT_THRESHOLD {
            Decision::Accept
        } else if score < REJECT_THRESHOLD {
            Decision::Reject
        } else {
            Decision::Review
        };

        assert_eq!(verdict.decision, expected, "score {}", score);
        assert!(verdict.confidence.ends_with('%'));
        assert_eq!(verdict.confidence, format!("{:.2}%", score as f64 * 100.0));
    }
}

#[test]
fn test_boundaries() {
    let thresholds = DecisionThresholds::default();
    assert_eq!(thresholds.decide(0.70).decision, Decision::Accept);
    assert_eq!(thresholds.decide(0.30).decision, Decision::Review);
    assert_eq!(thresholds.decide(0.2999).decision, Decision::Reject);
    assert_eq!(thresholds.decide(0.6999).decision, Decision::Review);
    assert_eq!(thresholds.decide(0.3001).decision, Decision::Review);
}

#[test]
fn test_extremes() {
    let thresholds = DecisionThresholds::default();

    let accept = thresholds.decide(1.0);
    assert_eq!(accept.decision, Decision::Accept);
    assert_eq!(accept.confidence, "100.00%");

    let reject = thresholds.decide(0.0);
    assert_eq!(reject.decision, Decision::Reject);
    assert_eq!(reject.confidence, "0.00%");
}
