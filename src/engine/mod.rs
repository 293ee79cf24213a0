//! Core engine — validate → evaluate → select → build, one batch at a time.

pub mod builder;
pub mod evaluator;
pub mod selector;

use tracing::{info, warn};

use crate::config::SelectionConfig;
use crate::types::{BatchResult, BetCandidate, EvaluatedBet, RejectedCandidate};

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Pipelines evaluation → per-fixture selection + shortlists → combination
/// assembly over a single candidate batch.
///
/// Holds only the policy configuration and allocates only local data per
/// call, so one instance can serve independent batches from multiple
/// threads concurrently. Parallelism belongs *across* invocations: the
/// per-fixture partition needs the complete batch before any pick can be
/// finalized.
pub struct SelectionEngine {
    config: SelectionConfig,
}

impl SelectionEngine {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Access the selection configuration.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Run the engine over one batch of candidates.
    ///
    /// Steps:
    /// 1. Exclude candidates violating the data-model invariants; they are
    ///    returned as the rejection list, never clamped into the batch.
    /// 2. Evaluate every remaining candidate exactly once.
    /// 3. Partition by fixture and apply the policy gate for the
    ///    per-fixture picks and the composite-score shortlist.
    /// 4. Rank the full evaluated set by edge for the value shortlist.
    /// 5. Assemble at most one combination from the same evaluated set.
    ///
    /// Every list in the returned `BatchResult` is derived from the same
    /// evaluated snapshot. An empty (or fully rejected) batch yields empty
    /// lists and an absent combination, never an error.
    pub fn run_batch(
        &self,
        candidates: &[BetCandidate],
    ) -> (BatchResult, Vec<RejectedCandidate>) {
        let mut rejected: Vec<RejectedCandidate> = Vec::new();
        let mut valid: Vec<&BetCandidate> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match candidate.validate() {
                Ok(()) => valid.push(candidate),
                Err(reason) => {
                    warn!(candidate = %candidate, reason = %reason, "Candidate rejected");
                    rejected.push(RejectedCandidate {
                        candidate: candidate.clone(),
                        reason,
                    });
                }
            }
        }

        let evaluated: Vec<EvaluatedBet> =
            valid.into_iter().map(evaluator::evaluate).collect();

        let fixtures = selector::fixture_results(&evaluated, &self.config);
        let top_picks = selector::top_picks(&fixtures, self.config.top_k);
        let value_picks = selector::value_picks(&evaluated, &self.config);
        let builder = builder::build(&evaluated, &self.config);

        let result = BatchResult {
            fixtures,
            top_picks,
            value_picks,
            builder,
        };

        info!(
            candidates_in = candidates.len(),
            rejected = rejected.len(),
            fixtures = result.fixtures.len(),
            picks = result.picked_fixtures(),
            value_picks = result.value_picks.len(),
            builder = result.builder.is_some(),
            "Selection batch complete"
        );

        (result, rejected)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateError, MarketGroup};

    fn make_candidate(fixture_id: u64, line: &str, odds: f64, prob: f64) -> BetCandidate {
        BetCandidate {
            fixture_id,
            league: "Premier League".to_string(),
            market: MarketGroup::Goals,
            line: line.to_string(),
            odds,
            model_probability: prob,
        }
    }

    fn make_engine() -> SelectionEngine {
        SelectionEngine::new(SelectionConfig::default())
    }

    #[test]
    fn test_empty_batch_yields_empty_result() {
        let (result, rejected) = make_engine().run_batch(&[]);
        assert!(result.fixtures.is_empty());
        assert!(result.top_picks.is_empty());
        assert!(result.value_picks.is_empty());
        assert!(result.builder.is_none());
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_single_strong_candidate_flows_to_all_outputs() {
        // odds 1.8 / model 0.70: qualifies everywhere except the builder
        // (which needs three legs).
        let candidates = vec![make_candidate(1, "O2.5", 1.8, 0.70)];
        let (result, rejected) = make_engine().run_batch(&candidates);
        assert!(rejected.is_empty());
        assert_eq!(result.picked_fixtures(), 1);
        assert_eq!(result.top_picks.len(), 1);
        assert_eq!(result.value_picks.len(), 1);
        assert!(result.builder.is_none());
    }

    #[test]
    fn test_invalid_candidates_rejected_and_excluded() {
        let candidates = vec![
            make_candidate(1, "O2.5", 1.8, 0.70),
            make_candidate(2, "bad_odds", 0.9, 0.70),
            make_candidate(3, "bad_prob", 1.8, 1.4),
        ];
        let (result, rejected) = make_engine().run_batch(&candidates);

        assert_eq!(rejected.len(), 2);
        assert!(matches!(
            rejected[0].reason,
            CandidateError::OddsTooLow { .. }
        ));
        assert!(matches!(
            rejected[1].reason,
            CandidateError::ProbabilityOutOfRange { .. }
        ));

        // Rejected fixtures never appear anywhere in the result.
        assert_eq!(result.fixtures.len(), 1);
        assert_eq!(result.fixtures[0].fixture_id, 1);
        assert!(result
            .value_picks
            .iter()
            .all(|p| p.candidate.fixture_id == 1));
    }

    #[test]
    fn test_fully_invalid_batch_behaves_like_empty() {
        let candidates = vec![make_candidate(1, "O2.5", f64::NAN, 0.70)];
        let (result, rejected) = make_engine().run_batch(&candidates);
        assert_eq!(rejected.len(), 1);
        assert!(result.fixtures.is_empty());
        assert!(result.builder.is_none());
    }

    #[test]
    fn test_all_outputs_share_one_evaluated_snapshot() {
        let candidates = vec![
            make_candidate(1, "O2.5", 1.8, 0.72),
            make_candidate(2, "BTTS_YES", 1.7, 0.74),
            make_candidate(3, "O9.5C", 1.9, 0.71),
        ];
        let (result, _) = make_engine().run_batch(&candidates);

        // Top picks are exactly the ranked per-fixture picks.
        for pick in &result.top_picks {
            let fixture = result
                .fixtures
                .iter()
                .find(|f| f.fixture_id == pick.candidate.fixture_id)
                .unwrap();
            assert_eq!(fixture.best_pick.as_ref().unwrap(), pick);
        }

        // Builder legs carry the same derived fields as the fixture picks.
        let selection = result.builder.as_ref().unwrap();
        for leg in &selection.legs {
            let fixture = result
                .fixtures
                .iter()
                .find(|f| f.fixture_id == leg.candidate.fixture_id)
                .unwrap();
            assert_eq!(
                fixture.best_pick.as_ref().unwrap().composite_score,
                leg.composite_score
            );
        }
    }

    #[test]
    fn test_determinism_byte_identical_results() {
        let candidates = vec![
            make_candidate(5, "O2.5", 1.8, 0.70),
            make_candidate(3, "BTTS_YES", 1.7, 0.74),
            make_candidate(5, "O9.5C", 1.9, 0.68),
            make_candidate(8, "O3.5cards", 2.0, 0.56),
        ];
        let engine = make_engine();
        let (first, _) = engine.run_batch(&candidates);
        let (second, _) = engine.run_batch(&candidates);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
        );
    }

    #[test]
    fn test_custom_config_flows_through() {
        let config = SelectionConfig {
            min_prob: 0.80, // stricter than any candidate below
            ..SelectionConfig::default()
        };
        let candidates = vec![make_candidate(1, "O2.5", 1.8, 0.70)];
        let (result, _) = SelectionEngine::new(config).run_batch(&candidates);
        assert_eq!(result.picked_fixtures(), 0);
        assert_eq!(result.fixtures.len(), 1); // fixture still reported
    }

    #[test]
    fn test_config_accessor() {
        let engine = make_engine();
        assert_eq!(engine.config().top_k, 3);
    }
}
