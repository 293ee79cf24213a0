//! Candidate evaluation.
//!
//! Enriches each raw candidate with its derived numeric fields: implied
//! probability, edge, expected value, and the composite ranking score.
//! Leaf stage: the caller excludes invalid candidates before they reach
//! this module, so evaluation is total.

use crate::types::{BetCandidate, EvaluatedBet};

// ---------------------------------------------------------------------------
// Composite score definition
// ---------------------------------------------------------------------------

/// Weight of the model probability in the composite score.
const PROB_WEIGHT: f64 = 0.55;

/// Weight of the edge in the composite score.
const EDGE_WEIGHT: f64 = 0.35;

/// Weight of the (capped) expected-value term in the composite score.
const VALUE_WEIGHT: f64 = 0.10;

/// Cap on the expected-value term. Without it a single candidate with
/// extreme quoted odds could dominate the score through variance rather
/// than genuine edge.
const VALUE_CAP: f64 = 0.20;

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Compute all derived fields for one candidate.
///
/// Pure: the output depends only on the candidate's odds and probability.
/// The composite score is computed here once so later stages never
/// recompute it.
pub fn evaluate(candidate: &BetCandidate) -> EvaluatedBet {
    let implied_probability = 1.0 / candidate.odds;
    let edge = candidate.model_probability - implied_probability;
    let expected_value = candidate.model_probability * candidate.odds - 1.0;

    let composite_score = PROB_WEIGHT * candidate.model_probability
        + EDGE_WEIGHT * edge
        + VALUE_WEIGHT * expected_value.clamp(0.0, VALUE_CAP);

    EvaluatedBet {
        candidate: candidate.clone(),
        implied_probability,
        edge,
        expected_value,
        composite_score,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
