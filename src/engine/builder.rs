//! Combination ("bet builder") assembly.
//!
//! Assembles at most one fixed-size multi-leg combination per batch from
//! the evaluated candidate pool. Independent of the per-fixture policy
//! gate: the builder prefers short-priced, high-confidence legs that the
//! gate would often refuse on odds alone.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::config::SelectionConfig;
use crate::types::{BuilderSelection, EvaluatedBet};

/// Assemble the combination, or nothing.
///
/// Walks the pool in descending `(model_probability, edge)` order, taking
/// at most one leg per fixture, and only returns a combination once the
/// configured leg count is reached. A half-built one is not a valid
/// output.
pub fn build(evaluated: &[EvaluatedBet], config: &SelectionConfig) -> Option<BuilderSelection> {
    // A combination has at least one leg; zero means the builder is off.
    if config.builder_legs == 0 {
        return None;
    }

    let mut pool: Vec<&EvaluatedBet> = evaluated
        .iter()
        .filter(|b| {
            b.candidate.model_probability >= config.builder_min_prob
                && b.candidate.odds >= config.builder_min_odds
                && b.candidate.odds <= config.builder_max_odds
        })
        .collect();

    // Prefer high probability, then value. Stable sort keeps input order
    // for fully tied legs.
    pool.sort_by(|a, b| {
        b.candidate
            .model_probability
            .partial_cmp(&a.candidate.model_probability)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.edge.partial_cmp(&a.edge).unwrap_or(Ordering::Equal))
    });

    let mut legs: Vec<EvaluatedBet> = Vec::new();
    let mut used_fixtures: HashSet<u64> = HashSet::new();

    for bet in pool {
        if legs.len() >= config.builder_legs {
            break;
        }
        // One leg per fixture: no double exposure to a single event.
        if !used_fixtures.insert(bet.candidate.fixture_id) {
            continue;
        }
        legs.push(bet.clone());
    }

    if legs.len() < config.builder_legs {
        debug!(
            legs = legs.len(),
            required = config.builder_legs,
            "Not enough distinct-fixture legs for a combination"
        );
        return None;
    }

    let combined_odds: f64 = legs.iter().map(|l| l.candidate.odds).product();
    let displayed_odds = combined_odds * config.builder_realism_factor;
    let combined_probability: f64 = legs.iter().map(|l| l.candidate.model_probability).product();

    debug!(
        legs = legs.len(),
        combined_odds,
        displayed_odds,
        combined_probability,
        "Combination assembled"
    );

    Some(BuilderSelection {
        legs,
        combined_odds,
        displayed_odds,
        combined_probability,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
