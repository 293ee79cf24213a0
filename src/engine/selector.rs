//! Policy gating and ranking.
//!
//! Partitions evaluated candidates by fixture, applies the policy gate,
//! and produces the per-fixture best pick plus the two global shortlists
//! (by composite score and by edge). All ordering is deterministic: ties
//! resolve to the first occurrence in input order, and fixtures are
//! reported in first-seen input order, never hash-map order.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::config::SelectionConfig;
use crate::types::{EvaluatedBet, FixtureOracleResult};

/// The per-fixture policy gate: a candidate qualifies only if the price,
/// the model probability, and the edge all clear their floors.
pub fn passes_golden_gate(bet: &EvaluatedBet, config: &SelectionConfig) -> bool {
    bet.candidate.odds >= config.min_odds
        && bet.candidate.model_probability >= config.min_prob
        && bet.edge >= config.min_edge
}

/// Descending by composite score, ties descending by edge. Used with a
/// stable sort so fully tied entries keep their input order.
fn by_score_then_edge(a: &EvaluatedBet, b: &EvaluatedBet) -> Ordering {
    b.composite_score
        .partial_cmp(&a.composite_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.edge.partial_cmp(&a.edge).unwrap_or(Ordering::Equal))
}

/// Whether `challenger` strictly outranks `incumbent` for a fixture's pick.
/// Strict comparisons keep the earliest candidate on full ties.
fn outranks(challenger: &EvaluatedBet, incumbent: &EvaluatedBet) -> bool {
    challenger.composite_score > incumbent.composite_score
        || (challenger.composite_score == incumbent.composite_score
            && challenger.edge > incumbent.edge)
}

/// Partition the evaluated batch by fixture and pick the highest-scoring
/// gate-passing candidate per fixture.
///
/// Every distinct fixture in the batch gets an entry, including fixtures
/// where no candidate qualified (absent pick), so callers can distinguish
/// "evaluated, no good bet" from "not evaluated".
pub fn fixture_results(
    evaluated: &[EvaluatedBet],
    config: &SelectionConfig,
) -> Vec<FixtureOracleResult> {
    let mut order: Vec<u64> = Vec::new();
    let mut grouped: HashMap<u64, Vec<&EvaluatedBet>> = HashMap::new();

    for bet in evaluated {
        let fixture_id = bet.candidate.fixture_id;
        if !grouped.contains_key(&fixture_id) {
            order.push(fixture_id);
        }
        grouped.entry(fixture_id).or_default().push(bet);
    }

    order
        .into_iter()
        .map(|fixture_id| {
            let bets = &grouped[&fixture_id];

            let mut best: Option<&EvaluatedBet> = None;
            for &bet in bets {
                if !passes_golden_gate(bet, config) {
                    continue;
                }
                match best {
                    Some(incumbent) if !outranks(bet, incumbent) => {}
                    _ => best = Some(bet),
                }
            }

            if best.is_none() {
                debug!(
                    fixture_id,
                    candidates = bets.len(),
                    "No candidate passed the policy gate"
                );
            }

            FixtureOracleResult {
                fixture_id,
                candidate_count: bets.len(),
                best_pick: best.cloned(),
            }
        })
        .collect()
}

/// The composite-score shortlist: per-fixture picks only (at most one bet
/// per fixture), ranked descending, truncated to `top_k`.
pub fn top_picks(fixtures: &[FixtureOracleResult], top_k: usize) -> Vec<EvaluatedBet> {
    let mut picks: Vec<EvaluatedBet> = fixtures
        .iter()
        .filter_map(|f| f.best_pick.clone())
        .collect();
    picks.sort_by(by_score_then_edge);
    picks.truncate(top_k);
    picks
}

/// The edge shortlist: the most undervalued candidates across the whole
/// batch under a looser gate, several per fixture allowed. "Most
/// undervalued" and "best single pick per event" are different questions,
/// so this list is drawn from all evaluated candidates.
pub fn value_picks(evaluated: &[EvaluatedBet], config: &SelectionConfig) -> Vec<EvaluatedBet> {
    let mut picks: Vec<EvaluatedBet> = evaluated
        .iter()
        .filter(|b| b.candidate.odds >= config.min_odds && b.edge >= config.value_min_edge)
        .cloned()
        .collect();
    picks.sort_by(|a, b| b.edge.partial_cmp(&a.edge).unwrap_or(Ordering::Equal));
    picks.truncate(config.top_k);
    picks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
