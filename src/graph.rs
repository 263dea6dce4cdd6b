//! Directed transaction multigraph.
//!
//! A compact adjacency-list graph keyed on a small integer node index, with a
//! separate `AccountId -> index` map for ingest. This beats a pointer graph
//! for cycle enumeration and BFS, and it supports first-appearance insertion
//! order (needed for deterministic tie-breaking) at no extra cost.

use crate::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Opaque account identifier. Equality and hashing are by value; the graph's
/// own node table gives a stable first-appearance order for iteration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

/// Index of a node in the graph's append-only node table.
pub type NodeIdx = usize;

/// The originating transaction attributes carried by one directed edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub transaction_id: String,
    pub amount: rust_decimal::Decimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
struct Edge {
    target: NodeIdx,
    data: EdgeData,
}

/// Directed multigraph over accounts, built once per analysis call and never
/// mutated by a detector afterward.
#[derive(Debug, Default)]
pub struct TransactionGraph {
    node_ids: Vec<AccountId>,
    index_of: HashMap<AccountId, NodeIdx>,
    out_edges: Vec<Vec<Edge>>,
    in_edges: Vec<Vec<Edge>>,
}

impl TransactionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: &AccountId) -> NodeIdx {
        if let Some(&idx) = self.index_of.get(id) {
            return idx;
        }
        let idx = self.node_ids.len();
        self.node_ids.push(id.clone());
        self.index_of.insert(id.clone(), idx);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        idx
    }

    /// Add a directed edge `sender -> receiver` carrying one transaction's
    /// attributes. Parallel edges and self-loops are both preserved.
    pub fn add_edge(&mut self, sender: &AccountId, receiver: &AccountId, data: EdgeData) {
        let from = self.ensure_node(sender);
        let to = self.ensure_node(receiver);
        self.out_edges[from].push(Edge {
            target: to,
            data: data.clone(),
        });
        self.in_edges[to].push(Edge {
            target: from,
            data,
        });
    }

    /// Build a graph from a transaction table, in table order. Every sender
    /// and receiver id observed becomes a node, in first-appearance order.
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut graph = Self::new();
        for tx in transactions {
            graph.add_edge(
                &tx.sender_id,
                &tx.receiver_id,
                EdgeData {
                    transaction_id: tx.transaction_id.clone(),
                    amount: tx.amount,
                    timestamp: tx.timestamp,
                },
            );
        }
        graph
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(|e| e.len()).sum()
    }

    /// Nodes in first-appearance (insertion) order.
    pub fn nodes(&self) -> impl Iterator<Item = &AccountId> {
        self.node_ids.iter()
    }

    pub fn node_index(&self, id: &AccountId) -> Option<NodeIdx> {
        self.index_of.get(id).copied()
    }

    pub fn account_id(&self, idx: NodeIdx) -> &AccountId {
        &self.node_ids[idx]
    }

    pub fn out_degree_idx(&self, idx: NodeIdx) -> usize {
        self.out_edges[idx].len()
    }

    pub fn in_degree_idx(&self, idx: NodeIdx) -> usize {
        self.in_edges[idx].len()
    }

    pub fn total_degree_idx(&self, idx: NodeIdx) -> usize {
        self.out_degree_idx(idx) + self.in_degree_idx(idx)
    }

    pub fn out_degree(&self, id: &AccountId) -> usize {
        self.node_index(id).map_or(0, |i| self.out_degree_idx(i))
    }

    pub fn in_degree(&self, id: &AccountId) -> usize {
        self.node_index(id).map_or(0, |i| self.in_degree_idx(i))
    }

    /// Distinct successor node indices reachable via a single out-edge
    /// (parallel edges to the same target collapse to one neighbor for
    /// traversal purposes; see `out_edges_idx` for per-transaction detail).
    pub fn successors_idx(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.out_edges[idx].iter().map(|e| e.target)
    }

    pub fn out_edges_idx(&self, idx: NodeIdx) -> impl Iterator<Item = (NodeIdx, &EdgeData)> {
        self.out_edges[idx].iter().map(|e| (e.target, &e.data))
    }
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
    fn build_preserves_insertion_order() {
        let txs = vec![tx("t1", "A", "B"), tx("t2", "C", "A"), tx("t3", "B", "C")];
        let graph = TransactionGraph::build(&txs);
        let order: Vec<&str> = graph.nodes().map(|a| a.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn parallel_edges_and_self_loops_preserved() {
        let txs = vec![tx("t1", "A", "B"), tx("t2", "A", "B"), tx("t3", "A", "A")];
        let graph = TransactionGraph::build(&txs);
        let a = graph.node_index(&AccountId::from("A")).unwrap();
        assert_eq!(graph.out_degree_idx(a), 3);
    }

    #[test]
    fn degree_counts_multi_edges() {
        let txs = vec![tx("t1", "A", "B"), tx("t2", "A", "B")];
        let graph = TransactionGraph::build(&txs);
        let b = graph.node_index(&AccountId::from("B")).unwrap();
        assert_eq!(graph.in_degree_idx(b), 2);
    }
}
