//! Simple-cycle enumeration, length 3..=5.
//!
//! The Python source calls `networkx.simple_cycles`, which enumerates all
//! simple cycles in a directed graph (an implementation of Johnson's
//! algorithm) and already dedupes by construction. A hand-rolled DFS does
//! not get that for free, so this detector does two things networkx's call
//! does implicitly: prunes exploration at `max_length`, and canonicalizes
//! each found cycle to its lexicographically smallest rotation before
//! inserting it into a dedup set.

use crate::graph::{AccountId, NodeIdx, TransactionGraph};
use std::collections::HashSet;

/// All directed simple cycles of length `3..=max_length`, each reported
/// exactly once under its lexicographically smallest rotation.
pub fn find_cycles(graph: &TransactionGraph, max_length: usize) -> Vec<Vec<AccountId>> {
    let n = graph.node_count();
    let mut seen: HashSet<Vec<AccountId>> = HashSet::new();
    let mut result = Vec::new();

    for start in 0..n {
        let mut path = vec![start];
        let mut on_path = vec![false; n];
        on_path[start] = true;
        dfs(graph, start, max_length, &mut path, &mut on_path, &mut seen, &mut result);
    }

    result
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    graph: &TransactionGraph,
    start: NodeIdx,
    max_length: usize,
    path: &mut Vec<NodeIdx>,
    on_path: &mut [bool],
    seen: &mut HashSet<Vec<AccountId>>,
    result: &mut Vec<Vec<AccountId>>,
) {
    let current = *path.last().unwrap();
    let mut visited_successors = HashSet::new();

    for next in graph.successors_idx(current) {
        if !visited_successors.insert(next) {
            continue;
        }

        if next == start {
            if (3..=max_length).contains(&path.len()) {
                record_cycle(graph, path, seen, result);
            }
            continue;
        }

        // Only explore successors with a larger index than `start`: any
        // cycle containing a smaller-indexed node will be (and was, or
        // will be) discovered when that smaller node is the outer `start`.
        if next < start || on_path[next] {
            continue;
        }
        if path.len() + 1 > max_length {
            continue;
        }

        on_path[next] = true;
        path.push(next);
        dfs(graph, start, max_length, path, on_path, seen, result);
        path.pop();
        on_path[next] = false;
    }
}

fn record_cycle(
    graph: &TransactionGraph,
    path: &[NodeIdx],
    seen: &mut HashSet<Vec<AccountId>>,
    result: &mut Vec<Vec<AccountId>>,
) {
    let ids: Vec<AccountId> = path.iter().map(|&i| graph.account_id(i).clone()).collect();
    let canonical = canonical_rotation(&ids);
    if seen.insert(canonical.clone()) {
        result.push(canonical);
    }
}

fn canonical_rotation(cycle: &[AccountId]) -> Vec<AccountId> {
    let n = cycle.len();
    (0..n)
        .map(|start| -> Vec<AccountId> { (0..n).map(|k| cycle[(start + k) % n].clone()).collect() })
        .min()
        .expect("cycle is non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transaction;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn tx(id: &str, from: &str, to: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            sender_id: AccountId::from(from),
            receiver_id: AccountId::from(to),
            amount: Decimal::new(100, 0),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn finds_triangle_cycle() {
        let txs = vec![tx("t1", "A", "B"), tx("t2", "B", "C"), tx("t3", "C", "A")];
        let graph = TransactionGraph::build(&txs);
        let cycles = find_cycles(&graph, 5);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 3);
    }

    #[test]
    fn excludes_self_loops_and_two_cycles() {
        let txs = vec![tx("t1", "A", "A"), tx("t2", "A", "B"), tx("t3", "B", "A")];
        let graph = TransactionGraph::build(&txs);
        let cycles = find_cycles(&graph, 5);
        assert!(cycles.is_empty());
    }

    #[test]
    fn respects_max_length() {
        // A -> B -> C -> D -> E -> A is a 5-cycle.
        let txs = vec![
            tx("t1", "A", "B"),
            tx("t2", "B", "C"),
            tx("t3", "C", "D"),
            tx("t4", "D", "E"),
            tx("t5", "E", "A"),
        ];
        let graph = TransactionGraph::build(&txs);
        assert_eq!(find_cycles(&graph, 5).len(), 1);
        assert_eq!(find_cycles(&graph, 4).len(), 0);
    }

    #[test]
    fn cycle_is_deterministic_under_rotation() {
        let txs = vec![tx("t1", "A", "B"), tx("t2", "B", "C"), tx("t3", "C", "A")];
        let graph = TransactionGraph::build(&txs);
        let cycles = find_cycles(&graph, 5);
        // Canonical rotation starts with the lexicographically smallest id.
        assert_eq!(cycles[0][0], AccountId::from("A"));
    }
}
