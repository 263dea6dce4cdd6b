//! Two-hop exposure detector: accounts within `cutoff` hops of an
//! already-suspicious account, via single-source BFS.

use crate::graph::AccountId;
use crate::graph::TransactionGraph;
use std::collections::{HashMap, HashSet, VecDeque};

/// Every account not already in `suspicious` that is reachable from some
/// `s in suspicious` by a directed path of length `1..=cutoff`.
pub fn find_two_hop_exposed(
    graph: &TransactionGraph,
    suspicious: &HashSet<AccountId>,
    cutoff: usize,
) -> HashSet<AccountId> {
    let mut exposed = HashSet::new();

    for s in suspicious {
        let Some(start) = graph.node_index(s) else {
            continue;
        };

        let mut distance: HashMap<usize, usize> = HashMap::new();
        distance.insert(start, 0);
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let d = distance[&current];
            if d >= cutoff {
                continue;
            }
            for next in graph.successors_idx(current) {
                if !distance.contains_key(&next) {
                    distance.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        for &idx in distance.keys() {
            if idx == start {
                continue;
            }
            let acc = graph.account_id(idx).clone();
            if !suspicious.contains(&acc) {
                exposed.insert(acc);
            }
        }
    }

    exposed
}
