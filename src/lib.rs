//! # fraudring-engine
//!
//! A graph-based fraud-ring detection engine: given one batch of
//! transactions, it builds a directed account graph and runs five
//! independent pattern detectors over it -- payment cycles, fan-in/fan-out
//! bursts, layered shell chains, two-hop exposure, and rapid movement --
//! consolidating their evidence into a ranked list of suspicious accounts
//! and the fraud rings that explain them.
//!
//! ## Design
//!
//! - **Stateless per call.** [`Analyzer`] holds only its configuration; it
//!   keeps nothing between calls and is safe to share across threads.
//! - **Pluggable ML/GNN scoring.** The final suspicion score blends graph
//!   evidence with an externally supplied ML score and GNN score (see
//!   [`gnn`]); both default to neutral constants.
//! - **CSV ingestion is optional.** The detection core has no I/O
//!   dependency; enable the `csv` feature (on by default) for
//!   [`ingest::load_transactions`].
//!
//! ## Example
//!
//! ```
//! use fraudring_engine::{Analyzer, Transaction, AccountId};
//! use chrono::Utc;
//! use rust_decimal::Decimal;
//!
//! let txs = vec![
//!     Transaction {
//!         transaction_id: "t1".into(),
//!         sender_id: AccountId::from("A"),
//!         receiver_id: AccountId::from("B"),
//!         amount: Decimal::new(10000, 2),
//!         timestamp: Utc::now(),
//!     },
//! ];
//! let response = Analyzer::new().analyze(&txs).unwrap();
//! assert_eq!(response.summary.total_accounts_analyzed, 2);
//! ```

pub mod analyzer;
pub mod config;
pub mod detectors;
pub mod error;
pub mod gnn;
pub mod graph;
#[cfg(feature = "csv")]
pub mod ingest;
pub mod response;
pub mod scorer;
pub mod window;

pub use analyzer::Analyzer;
pub use config::BatchConfig;
pub use error::{FraudRingError, Result};
pub use graph::{AccountId, TransactionGraph};
pub use response::{AnalysisResponse, FraudRing, PatternTag, SuspiciousAccount, Summary};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One transaction: a directed, timestamped, amount-carrying edge between
/// two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}
