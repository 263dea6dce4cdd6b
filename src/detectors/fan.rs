//! Fan-in / fan-out detector: bursts of distinct counterparties within a
//! sliding time window.

use crate::graph::AccountId;
use crate::response::PatternTag;
use crate::window::sliding_window_distinct;
use crate::Transaction;
use chrono::Duration;
use std::collections::HashMap;

/// For each account, which of `fan_in` / `fan_out` it qualifies for. Both
/// tags may coexist on the same account.
pub fn detect_fan_in_out(
    transactions: &[Transaction],
    window: Duration,
    distinct_threshold: usize,
) -> HashMap<AccountId, Vec<PatternTag>> {
    let mut receivers: HashMap<&AccountId, Vec<&Transaction>> = HashMap::new();
    let mut senders: HashMap<&AccountId, Vec<&Transaction>> = HashMap::new();
    for tx in transactions {
        receivers.entry(&tx.receiver_id).or_default().push(tx);
        senders.entry(&tx.sender_id).or_default().push(tx);
    }

    let mut suspicious: HashMap<AccountId, Vec<PatternTag>> = HashMap::new();

    for (receiver, mut group) in receivers {
        group.sort_by_key(|t| t.timestamp);
        if sliding_window_distinct(
            &group,
            |t| t.timestamp,
            |t| &t.sender_id,
            window,
            distinct_threshold,
        ) {
            suspicious
                .entry(receiver.clone())
                .or_default()
                .push(PatternTag::FanIn);
        }
    }

    for (sender, mut group) in senders {
        group.sort_by_key(|t| t.timestamp);
        if sliding_window_distinct(
            &group,
            |t| t.timestamp,
            |t| &t.receiver_id,
            window,
            distinct_threshold,
        ) {
            suspicious
                .entry(sender.clone())
                .or_default()
                .push(PatternTag::FanOut);
        }
    }

    suspicious
}
