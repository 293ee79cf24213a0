//! Shared types for the selection & ranking engine.
//!
//! These types form the data model used across the evaluator, selector,
//! and builder stages. They are created fresh per batch invocation and
//! never outlive the `BatchResult` they end up in.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Market groups
// ---------------------------------------------------------------------------

/// The closed set of supported market groups.
///
/// Candidates outside these groups never reach the engine; within the
/// engine the group is used only for identity and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketGroup {
    /// Goal totals (e.g. Over/Under 2.5).
    Goals,
    /// Both teams to score.
    Btts,
    /// Corner totals.
    Corners,
    /// Card totals.
    Cards,
}

impl MarketGroup {
    /// All known market groups (useful for iteration).
    pub const ALL: &'static [MarketGroup] = &[
        MarketGroup::Goals,
        MarketGroup::Btts,
        MarketGroup::Corners,
        MarketGroup::Cards,
    ];
}

impl fmt::Display for MarketGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketGroup::Goals => write!(f, "goals"),
            MarketGroup::Btts => write!(f, "btts"),
            MarketGroup::Corners => write!(f, "corners"),
            MarketGroup::Cards => write!(f, "cards"),
        }
    }
}

/// Attempt to parse a string into a MarketGroup (case-insensitive).
impl std::str::FromStr for MarketGroup {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "goals" | "goal" | "totals" => Ok(MarketGroup::Goals),
            "btts" | "both_teams_to_score" => Ok(MarketGroup::Btts),
            "corners" | "corner" => Ok(MarketGroup::Corners),
            "cards" | "card" => Ok(MarketGroup::Cards),
            _ => Err(anyhow::anyhow!("Unknown market group: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A raw betting proposition: a market quote plus a model-estimated
/// probability. One per proposition; immutable input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetCandidate {
    /// Groups candidates belonging to the same real-world event.
    pub fixture_id: u64,
    /// Free-form label, informational only.
    pub league: String,
    pub market: MarketGroup,
    /// Short selection code within the market, e.g. "O2.5", "BTTS_YES".
    /// Opaque to the engine.
    pub line: String,
    /// Decimal (European) price. Must be finite and strictly above 1.0.
    pub odds: f64,
    /// Estimated probability of the selection winning, in [0, 1].
    pub model_probability: f64,
}

impl fmt::Display for BetCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] #{} {} {} @ {:.2} (model: {:.0}%)",
            self.league,
            self.fixture_id,
            self.market,
            self.line,
            self.odds,
            self.model_probability * 100.0,
        )
    }
}

impl BetCandidate {
    /// Check the data-model invariants: finite odds strictly above 1.0 and
    /// a finite probability in [0, 1]. Violations are rejected before
    /// evaluation rather than clamped, since clamping would corrupt ranking.
    pub fn validate(&self) -> Result<(), CandidateError> {
        if !self.odds.is_finite() {
            return Err(CandidateError::OddsNotFinite { odds: self.odds });
        }
        if self.odds <= 1.0 {
            return Err(CandidateError::OddsTooLow { odds: self.odds });
        }
        if !self.model_probability.is_finite() {
            return Err(CandidateError::ProbabilityNotFinite {
                probability: self.model_probability,
            });
        }
        if !(0.0..=1.0).contains(&self.model_probability) {
            return Err(CandidateError::ProbabilityOutOfRange {
                probability: self.model_probability,
            });
        }
        Ok(())
    }

    /// Helper to build a test candidate with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        BetCandidate {
            fixture_id: 1001,
            league: "Premier League".to_string(),
            market: MarketGroup::Goals,
            line: "O2.5".to_string(),
            odds: 1.8,
            model_probability: 0.70,
        }
    }
}

/// A candidate enriched with the derived numeric fields. Immutable once
/// computed; every later stage reads these fields instead of recomputing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedBet {
    pub candidate: BetCandidate,
    /// 1 / odds.
    pub implied_probability: f64,
    /// model_probability - implied_probability. Positive means the model
    /// considers the bet undervalued by the market.
    pub edge: f64,
    /// model_probability * odds - 1: expected return per unit staked.
    pub expected_value: f64,
    /// Single ranking scalar blending confidence and value.
    pub composite_score: f64,
}

impl fmt::Display for EvaluatedBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | implied={:.1}% edge={:+.1}% ev={:+.3} score={:.4}",
            self.candidate,
            self.implied_probability * 100.0,
            self.edge * 100.0,
            self.expected_value,
            self.composite_score,
        )
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-fixture outcome: at most one best pick for the event.
///
/// Fixtures whose candidates all fail the policy gate still get an entry
/// (with an absent pick), so callers can tell "evaluated, no good bet"
/// from "not evaluated".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureOracleResult {
    pub fixture_id: u64,
    /// Number of valid candidates evaluated for this fixture.
    pub candidate_count: usize,
    pub best_pick: Option<EvaluatedBet>,
}

impl fmt::Display for FixtureOracleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.best_pick {
            Some(pick) => write!(f, "#{}: {}", self.fixture_id, pick),
            None => write!(
                f,
                "#{}: no qualifying pick ({} candidates)",
                self.fixture_id, self.candidate_count,
            ),
        }
    }
}

/// A constrained multi-leg combination assembled from the evaluated pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderSelection {
    /// Ordered legs; no two legs share a fixture.
    pub legs: Vec<EvaluatedBet>,
    /// Product of the leg odds.
    pub combined_odds: f64,
    /// combined_odds scaled by the realism factor: a heuristic discount
    /// for the margin a bookmaker applies to a multiplied price, not a
    /// statistical correction.
    pub displayed_odds: f64,
    /// Product of the leg model probabilities, under an independence
    /// assumption between legs. May overstate the true combined
    /// probability when legs share broader event context.
    pub combined_probability: f64,
}

impl fmt::Display for BuilderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} legs @ {:.2} (displayed {:.2}, p={:.0}%)",
            self.legs.len(),
            self.combined_odds,
            self.displayed_odds,
            self.combined_probability * 100.0,
        )
    }
}

/// The full output of one engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// One entry per distinct fixture in the valid input, first-seen order.
    pub fixtures: Vec<FixtureOracleResult>,
    /// Per-fixture picks ranked by composite score, truncated to top-k.
    pub top_picks: Vec<EvaluatedBet>,
    /// Highest-edge candidates across the whole batch (several per fixture
    /// allowed), truncated to top-k.
    pub value_picks: Vec<EvaluatedBet>,
    pub builder: Option<BuilderSelection>,
}

impl BatchResult {
    /// Number of fixtures that produced a best pick.
    pub fn picked_fixtures(&self) -> usize {
        self.fixtures.iter().filter(|f| f.best_pick.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Invariant violations that exclude a candidate from the batch.
///
/// These are data-quality signals surfaced to the caller, never fatal to
/// the batch as a whole.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CandidateError {
    #[error("odds must be finite, got {odds}")]
    OddsNotFinite { odds: f64 },

    #[error("odds must be strictly above 1.0, got {odds}")]
    OddsTooLow { odds: f64 },

    #[error("model probability must be finite, got {probability}")]
    ProbabilityNotFinite { probability: f64 },

    #[error("model probability must lie in [0, 1], got {probability}")]
    ProbabilityOutOfRange { probability: f64 },
}

/// A candidate excluded before evaluation, with the reason. Returned to
/// the caller alongside the `BatchResult`, never inside it.
#[derive(Debug, Clone)]
pub struct RejectedCandidate {
    pub candidate: BetCandidate,
    pub reason: CandidateError,
}

impl fmt::Display for RejectedCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.candidate, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
