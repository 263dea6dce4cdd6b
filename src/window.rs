//! Pure functions over time-ordered transaction sub-streams: the
//! sliding-window distinct-counterparty test and the rapid-movement test.

use crate::graph::AccountId;
use crate::Transaction;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Two-pointer sweep over a time-sorted sub-stream: true iff some window of
/// length `<= window` contains at least `threshold` distinct counterparties.
///
/// `items` must already be sorted by timestamp ascending; ties break by
/// input order, i.e. whatever order they arrive in `items`.
pub fn sliding_window_distinct<T>(
    items: &[T],
    timestamp_of: impl Fn(&T) -> DateTime<Utc>,
    counterparty_of: impl Fn(&T) -> &AccountId,
    window: Duration,
    threshold: usize,
) -> bool {
    if items.len() < threshold {
        return false;
    }

    let mut left = 0usize;
    let mut counts: HashMap<&AccountId, usize> = HashMap::new();
    let mut distinct = 0usize;

    for right in 0..items.len() {
        let cp = counterparty_of(&items[right]);
        let entry = counts.entry(cp).or_insert(0);
        if *entry == 0 {
            distinct += 1;
        }
        *entry += 1;

        while timestamp_of(&items[right]) - timestamp_of(&items[left]) > window {
            let left_cp = counterparty_of(&items[left]);
            if let Some(c) = counts.get_mut(left_cp) {
                *c -= 1;
                if *c == 0 {
                    distinct -= 1;
                }
            }
            left += 1;
        }

        if distinct >= threshold {
            return true;
        }
    }

    false
}

/// Flags every account that both receives and sends within `window` of the
/// send, i.e. there is a send `s` and a receive `r` on the same account with
/// `s.timestamp - window <= r.timestamp <= s.timestamp`.
///
/// Groups transactions into each account's send/receive lists in one O(n)
/// pass (the same `HashMap::entry().or_default()` bucketing
/// `detect_fan_in_out` uses) rather than rescanning the full batch once per
/// account, then runs a merge-style scan over each account's sorted sends
/// and receives rather than a nested loop: for each send, only receives
/// within `window` before it can possibly satisfy the condition, so once a
/// candidate receive falls out of range to the left we can stop looking
/// further back. Overall cost is O(n log n), dominated by sorting each
/// account's bucket.
pub fn flag_rapid_movement(
    transactions: &[Transaction],
    window: Duration,
) -> Vec<AccountId> {
    let mut accounts: Vec<AccountId> = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut sends: std::collections::HashMap<&AccountId, Vec<DateTime<Utc>>> =
        std::collections::HashMap::new();
    let mut receives: std::collections::HashMap<&AccountId, Vec<DateTime<Utc>>> =
        std::collections::HashMap::new();
    for tx in transactions {
        sends.entry(&tx.sender_id).or_default().push(tx.timestamp);
        receives.entry(&tx.receiver_id).or_default().push(tx.timestamp);
        for acc in [&tx.sender_id, &tx.receiver_id] {
            if seen.insert(acc.clone()) {
                accounts.push(acc.clone());
            }
        }
    }

    let mut flagged = Vec::new();
    for acc in &accounts {
        let mut acc_sends = sends.get(acc).cloned().unwrap_or_default();
        let mut acc_receives = receives.get(acc).cloned().unwrap_or_default();
        acc_sends.sort();
        acc_receives.sort();

        if has_rapid_movement(&acc_sends, &acc_receives, window) {
            flagged.push(acc.clone());
        }
    }

    flagged
}

fn has_rapid_movement(sends: &[DateTime<Utc>], receives: &[DateTime<Utc>], window: Duration) -> bool {
    if sends.is_empty() || receives.is_empty() {
        return false;
    }
    let mut r = 0usize;
    for &s in sends {
        let lower = s - window;
        while r < receives.len() && receives[r] < lower {
            r += 1;
        }
        // receives is sorted, so if the earliest receive still in range
        // exceeds s, every later one does too.
        if r < receives.len() && receives[r] <= s {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    #[derive(Clone)]
    struct Item {
        t: DateTime<Utc>,
        cp: AccountId,
    }

    #[test]
    fn short_stream_short_circuits_false() {
        let items = vec![Item {
            t: ts(0),
            cp: AccountId::from("A"),
        }];
        assert!(!sliding_window_distinct(
            &items,
            |i| i.t,
            |i| &i.cp,
            Duration::hours(72),
            10
        ));
    }

    #[test]
    fn ten_distinct_within_window_is_true() {
        let items: Vec<Item> = (0..10)
            .map(|i| Item {
                t: ts(i),
                cp: AccountId::from(format!("CP{i}").as_str()),
            })
            .collect();
        assert!(sliding_window_distinct(
            &items,
            |i| i.t,
            |i| &i.cp,
            Duration::hours(72),
            10
        ));
    }

    #[test]
    fn distinct_outside_window_does_not_count() {
        // 9 distinct cps close together, a 10th far outside the window.
        let mut items: Vec<Item> = (0..9)
            .map(|i| Item {
                t: ts(i),
                cp: AccountId::from(format!("CP{i}").as_str()),
            })
            .collect();
        items.push(Item {
            t: ts(9) + Duration::hours(100),
            cp: AccountId::from("CP9"),
        });
        assert!(!sliding_window_distinct(
            &items,
            |i| i.t,
            |i| &i.cp,
            Duration::hours(72),
            10
        ));
    }

    #[test]
    fn rapid_movement_detects_receive_before_send() {
        let sends = vec![ts(10)];
        let receives = vec![ts(5)];
        assert!(has_rapid_movement(&sends, &receives, Duration::minutes(10)));
    }

    #[test]
    fn rapid_movement_false_when_receive_too_early() {
        let sends = vec![ts(20)];
        let receives = vec![ts(5)];
        assert!(!has_rapid_movement(&sends, &receives, Duration::minutes(10)));
    }
}
