//! Plug-in scoring inputs.
//!
//! The source imports a real graph neural network (`gnn_engine.py`, a
//! two-layer `GCNConv` stack over degree/clustering/PageRank features) but
//! `analyzer.py` never calls it -- it bypasses inference entirely and uses
//! a dummy constant `0.5` for every node. The specification keeps that as
//! the contract: the ML/GNN contribution is an externally supplied
//! per-node value with a stable interface, defaulting to a neutral
//! constant. Detectors never depend on either being populated.

use crate::graph::AccountId;

/// Supplies a per-account ML score in `[0, 1]`, defaulting to 0.0.
pub trait MlScorer {
    fn ml_score(&self, account: &AccountId) -> f64;
}

/// Supplies a per-account GNN score in `[0, 1]`, defaulting to 0.5.
pub trait GnnScorer {
    fn gnn_score(&self, account: &AccountId) -> f64;
}

/// The default plug-in: returns the same constant for every account,
/// matching the source's dummy-score bypass.
#[derive(Debug, Clone, Copy)]
pub struct ConstantScorer(pub f64);

impl MlScorer for ConstantScorer {
    fn ml_score(&self, _account: &AccountId) -> f64 {
        self.0
    }
}

impl GnnScorer for ConstantScorer {
    fn gnn_score(&self, _account: &AccountId) -> f64 {
        self.0
    }
}

impl Default for ConstantScorer {
    /// The source's dummy GNN score: 0.5 for every node.
    fn default() -> Self {
        ConstantScorer(crate::scorer::DEFAULT_GNN_SCORE)
    }
}
