//! Configuration loading from TOML.
//!
//! The selection thresholds are always passed into the engine explicitly
//! (never read from ambient/global state), so concurrent invocations with
//! different policies cannot interfere and tests can exercise arbitrary
//! threshold combinations. This module only provides the typed structs and
//! a TOML loader for the binary.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub selection: SelectionConfig,
}

/// Policy thresholds for one engine invocation.
///
/// Any subset may be overridden in `config.toml`; unspecified fields take
/// the documented defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Minimum decimal odds for the per-fixture policy gate.
    pub min_odds: f64,
    /// Minimum model probability for the per-fixture policy gate.
    pub min_prob: f64,
    /// Minimum edge for the per-fixture policy gate.
    pub min_edge: f64,
    /// Looser edge floor for the value shortlist.
    pub value_min_edge: f64,
    /// Length of both global shortlists.
    pub top_k: usize,
    /// Number of legs a combination must reach; zero disables the builder.
    pub builder_legs: usize,
    /// Minimum model probability for a builder leg.
    pub builder_min_prob: f64,
    /// Lowest acceptable leg odds.
    pub builder_min_odds: f64,
    /// Highest acceptable leg odds.
    pub builder_max_odds: f64,
    /// Discount applied to the multiplied combination price. A heuristic
    /// adjustment for bookmaker margin, not a probability calibration.
    pub builder_realism_factor: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_odds: 1.6,
            min_prob: 0.62,
            min_edge: 0.03,
            value_min_edge: 0.05,
            top_k: 3,
            builder_legs: 3,
            builder_min_prob: 0.70,
            builder_min_odds: 1.40,
            builder_max_odds: 2.10,
            builder_realism_factor: 0.75,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_defaults() {
        let cfg = SelectionConfig::default();
        assert_eq!(cfg.min_odds, 1.6);
        assert_eq!(cfg.min_prob, 0.62);
        assert_eq!(cfg.min_edge, 0.03);
        assert_eq!(cfg.value_min_edge, 0.05);
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.builder_legs, 3);
        assert_eq!(cfg.builder_min_prob, 0.70);
        assert_eq!(cfg.builder_min_odds, 1.40);
        assert_eq!(cfg.builder_max_odds, 2.10);
        assert_eq!(cfg.builder_realism_factor, 0.75);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [selection]
            min_prob = 0.65
            top_k = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.selection.min_prob, 0.65);
        assert_eq!(cfg.selection.top_k, 5);
        // Untouched fields fall back to the documented defaults.
        assert_eq!(cfg.selection.min_odds, 1.6);
        assert_eq!(cfg.selection.builder_realism_factor, 0.75);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.selection, SelectionConfig::default());
    }
}
