//! Typed output model: the per-account evidence accumulator, the closed
//! pattern-tag vocabulary, and the response the analyzer ultimately emits.

use crate::graph::AccountId;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A finite, closed set of detection labels. Represented as a tagged variant
/// rather than a free-form string, so consolidation logic over it is
/// exhaustively checkable by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTag {
    CycleLength(u8),
    FanIn,
    FanOut,
    LayeredShell,
    TwoHopExposure,
    RapidMovement,
    MerchantActivity,
}

impl PatternTag {
    pub fn as_string(&self) -> String {
        match self {
            PatternTag::CycleLength(k) => format!("cycle_length_{k}"),
            PatternTag::FanIn => "fan_in".to_string(),
            PatternTag::FanOut => "fan_out".to_string(),
            PatternTag::LayeredShell => "layered_shell".to_string(),
            PatternTag::TwoHopExposure => "two_hop_exposure".to_string(),
            PatternTag::RapidMovement => "rapid_movement".to_string(),
            PatternTag::MerchantActivity => "merchant_activity".to_string(),
        }
    }
}

impl std::fmt::Display for PatternTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl Serialize for PatternTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

/// Push `tag` onto `patterns` iff it isn't already present, preserving the
/// ordered-set invariant ("no pattern tag appears more than once").
pub fn union_pattern(patterns: &mut Vec<PatternTag>, tag: PatternTag) {
    if !patterns.contains(&tag) {
        patterns.push(tag);
    }
}

/// Internal per-account evidence accumulator. Once an account has an entry
/// its `ring_id` is stable for the remainder of the analysis.
#[derive(Debug, Clone)]
pub struct EvidenceEntry {
    pub score: f64,
    pub patterns: Vec<PatternTag>,
    pub ring_id: String,
}

/// One consolidated fraud ring.
#[derive(Debug, Clone, Serialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub member_accounts: Vec<AccountId>,
    pub pattern_type: PatternTag,
    pub risk_score: f64,
}

/// One flagged account in the final report.
#[derive(Debug, Clone, Serialize)]
pub struct SuspiciousAccount {
    pub account_id: AccountId,
    pub suspicion_score: f64,
    pub detected_patterns: Vec<PatternTag>,
    pub ring_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: Summary,
}

impl AnalysisResponse {
    /// The well-formed zero response for an empty batch.
    pub fn empty() -> Self {
        Self {
            suspicious_accounts: Vec::new(),
            fraud_rings: Vec::new(),
            summary: Summary {
                total_accounts_analyzed: 0,
                suspicious_accounts_flagged: 0,
                fraud_rings_detected: 0,
                processing_time_seconds: 0.0,
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_pattern_dedupes() {
        let mut patterns = vec![PatternTag::FanIn];
        union_pattern(&mut patterns, PatternTag::FanIn);
        union_pattern(&mut patterns, PatternTag::FanOut);
        assert_eq!(patterns, vec![PatternTag::FanIn, PatternTag::FanOut]);
    }

    #[test]
    fn pattern_tag_serializes_as_snake_case_string() {
        assert_eq!(PatternTag::CycleLength(3).as_string(), "cycle_length_3");
        assert_eq!(PatternTag::TwoHopExposure.as_string(), "two_hop_exposure");
    }

    #[test]
    fn empty_response_is_well_formed() {
        let resp = AnalysisResponse::empty();
        assert_eq!(resp.summary.total_accounts_analyzed, 0);
        assert!(resp.suspicious_accounts.is_empty());
        assert!(resp.fraud_rings.is_empty());
    }
}
