//! Crate-wide error type.

use thiserror::Error;

/// Failure modes for the fraud-ring detection pipeline.
///
/// `EmptyBatch` is deliberately not a variant here: an empty transaction
/// table is not an error, it yields the zero-valued [`crate::response::AnalysisResponse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FraudRingError {
    /// A required column was absent from the input table.
    #[error("schema error: {0}")]
    Schema(String),

    /// A row could not be parsed (malformed timestamp, amount, or id).
    #[error("parse error: {0}")]
    Parse(String),

    /// An unexpected condition inside a detector or the scorer.
    ///
    /// The core does not attempt partial recovery from this: producing some
    /// detectors' output while silently suppressing others would violate the
    /// consolidation invariants in the ring consolidator.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, FraudRingError>;
