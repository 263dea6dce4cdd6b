//! Compiled configuration constants for the detection pipeline.
//!
//! The core does not read these from the environment, matching the source,
//! which hard-codes every threshold inline.

/// Tunable thresholds for a single analysis call.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Longest simple cycle length reported by the cycle detector.
    pub max_cycle_length: usize,
    /// Sliding window length for the fan-in/out distinct-counterparty test, in hours.
    pub fan_window_hours: i64,
    /// Distinct-counterparty threshold for fan-in/out.
    pub fan_distinct_threshold: usize,
    /// Longest chain reported by the layered-shell detector.
    pub max_chain_length: usize,
    /// Maximum total degree an intermediate node may have to qualify as a shell link.
    pub intermediate_degree_threshold: usize,
    /// BFS cutoff (in hops) for two-hop exposure.
    pub two_hop_cutoff: usize,
    /// Rapid-movement receive-before-send window, in minutes.
    pub rapid_movement_window_minutes: i64,
    /// In-degree above which a zero-out-degree account is treated as a merchant.
    pub merchant_in_degree_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_cycle_length: 5,
            fan_window_hours: 72,
            fan_distinct_threshold: 10,
            max_chain_length: 5,
            intermediate_degree_threshold: 3,
            two_hop_cutoff: 2,
            rapid_movement_window_minutes: 10,
            merchant_in_degree_threshold: 50,
        }
    }
}
