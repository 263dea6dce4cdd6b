//! Final per-account suspicion score: a weighted blend of graph evidence,
//! an externally supplied ML score, and a GNN score (defaulting to a
//! neutral 0.5 plug-in constant, see [`crate::gnn`]), with a merchant
//! override short-circuit.

use crate::response::PatternTag;

/// Which detector last contributed graph evidence for an account. Each
/// variant carries a fixed weight; a later detector's contribution
/// replaces (does not accumulate with) an earlier one's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Cycle,
    FanPattern,
    LayeredShell,
    TwoHop,
    RapidMovement,
}

impl DetectorKind {
    pub fn graph_score(self) -> f64 {
        match self {
            DetectorKind::Cycle => 0.5,
            DetectorKind::FanPattern => 0.3,
            DetectorKind::LayeredShell => 0.4,
            DetectorKind::TwoHop => 0.2,
            DetectorKind::RapidMovement => 0.1,
        }
    }
}

/// Default ML score when no plug-in is supplied.
pub const DEFAULT_ML_SCORE: f64 = 0.0;
/// Default GNN score: the "GNN" path is a stub that always returns this
/// constant (see [`crate::gnn`]).
pub const DEFAULT_GNN_SCORE: f64 = 0.5;

/// Score one account. `graph_score`, `ml_score`, and `gnn_score` are each in
/// `[0, 1]`. Returns the final score and any extra pattern tags the scorer
/// itself contributes (only the merchant override does).
pub fn score_account(
    in_degree: usize,
    out_degree: usize,
    graph_score: f64,
    ml_score: f64,
    gnn_score: f64,
    merchant_in_degree_threshold: usize,
) -> (f64, Vec<PatternTag>) {
    if in_degree > merchant_in_degree_threshold && out_degree == 0 {
        // Preserved verbatim from source: this 5.0 marker sits on a
        // different scale than the 0-100 weighted branch below.
        return (5.0, vec![PatternTag::MerchantActivity]);
    }

    let raw = 0.4 * graph_score + 0.3 * ml_score + 0.3 * gnn_score;
    (round2(raw * 100.0), Vec::new())
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_override_returns_marker_score() {
        let (score, patterns) = score_account(60, 0, 0.5, 0.0, 0.5, 50);
        assert_eq!(score, 5.0);
        assert_eq!(patterns, vec![PatternTag::MerchantActivity]);
    }

    #[test]
    fn non_merchant_uses_weighted_blend() {
        let (score, patterns) = score_account(
            2,
            2,
            DetectorKind::Cycle.graph_score(),
            DEFAULT_ML_SCORE,
            DEFAULT_GNN_SCORE,
            50,
        );
        assert_eq!(score, 35.0);
        assert!(patterns.is_empty());
    }

    #[test]
    fn fan_pattern_weight_matches_spec_scenario() {
        let (score, _) = score_account(
            1,
            1,
            DetectorKind::FanPattern.graph_score(),
            DEFAULT_ML_SCORE,
            DEFAULT_GNN_SCORE,
            50,
        );
        assert_eq!(score, 27.0);
    }

    #[test]
    fn two_hop_weight_matches_spec_scenario() {
        let (score, _) = score_account(
            1,
            1,
            DetectorKind::TwoHop.graph_score(),
            DEFAULT_ML_SCORE,
            DEFAULT_GNN_SCORE,
            50,
        );
        assert_eq!(score, 23.0);
    }

    #[test]
    fn rapid_movement_weight_matches_spec_scenario() {
        let (score, _) = score_account(
            1,
            1,
            DetectorKind::RapidMovement.graph_score(),
            DEFAULT_ML_SCORE,
            DEFAULT_GNN_SCORE,
            50,
        );
        assert_eq!(score, 19.0);
    }

    #[test]
    fn degree_exactly_at_merchant_threshold_does_not_override() {
        let (score, patterns) = score_account(50, 0, 0.5, 0.0, 0.5, 50);
        assert_ne!(score, 5.0);
        assert!(patterns.is_empty());
    }
}
