//! Transaction graph builder (C1).
//!
//! Aggregates a batch of transactions into a directed multigraph with
//! per-edge transaction lists and per-account activity counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single validated input transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// A transaction as retained inside an aggregated edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRecord {
    pub transaction_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// One aggregated directed edge between two accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub transactions: Vec<TxRecord>,
    pub total_amount: f64,
    pub count: usize,
}

/// Read-only activity counters for a single account.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AccountStats {
    pub total_transactions: usize,
    pub in_degree: usize,
    pub out_degree: usize,
}

/// Directed multigraph of accounts, with multi-transactions collapsed into
/// one edge per (sender, receiver) pair.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<String>,
    node_set: HashSet<String>,
    edges: Vec<Edge>,
    edge_index: HashMap<(String, String), usize>,
    successors: HashMap<String, Vec<String>>,
    predecessors: HashMap<String, Vec<String>>,
    stats: HashMap<String, AccountStats>,
}

impl Graph {
    /// Builds the aggregated graph from a sequence of transactions.
    pub fn load(transactions: &[Transaction]) -> Self {
        let mut graph = Graph::default();

        for tx in transactions {
            graph.touch_node(&tx.sender_id);
            graph.touch_node(&tx.receiver_id);

            let key = (tx.sender_id.clone(), tx.receiver_id.clone());
            let record = TxRecord {
                transaction_id: tx.transaction_id.clone(),
                amount: tx.amount,
                timestamp: tx.timestamp,
            };

            match graph.edge_index.get(&key) {
                Some(&idx) => {
                    let edge = &mut graph.edges[idx];
                    edge.total_amount += record.amount;
                    edge.count += 1;
                    edge.transactions.push(record);
                }
                None => {
                    graph.edge_index.insert(key, graph.edges.len());
                    graph.edges.push(Edge {
                        source: tx.sender_id.clone(),
                        target: tx.receiver_id.clone(),
                        total_amount: record.amount,
                        count: 1,
                        transactions: vec![record],
                    });
                    graph
                        .successors
                        .entry(tx.sender_id.clone())
                        .or_default()
                        .push(tx.receiver_id.clone());
                    graph
                        .predecessors
                        .entry(tx.receiver_id.clone())
                        .or_default()
                        .push(tx.sender_id.clone());
                }
            }

            graph.stats.entry(tx.sender_id.clone()).or_default().total_transactions += 1;
            graph.stats.entry(tx.receiver_id.clone()).or_default().total_transactions += 1;
        }

        for node in &graph.nodes {
            let in_degree = graph.predecessors.get(node).map_or(0, Vec::len);
            let out_degree = graph.successors.get(node).map_or(0, Vec::len);
            let entry = graph.stats.entry(node.clone()).or_default();
            entry.in_degree = in_degree;
            entry.out_degree = out_degree;
        }

        graph
    }

    fn touch_node(&mut self, id: &str) {
        if self.node_set.insert(id.to_string()) {
            self.nodes.push(id.to_string());
        }
    }

    /// Accounts in first-seen order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_set.contains(id)
    }

    /// Aggregated edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.edge_index
            .get(&(source.to_string(), target.to_string()))
            .map(|&idx| &self.edges[idx])
    }

    /// Distinct successors of `id`, in first-seen order.
    pub fn successors(&self, id: &str) -> &[String] {
        self.successors.get(id).map_or(&[], Vec::as_slice)
    }

    /// Distinct predecessors of `id`, in first-seen order.
    pub fn predecessors(&self, id: &str) -> &[String] {
        self.predecessors.get(id).map_or(&[], Vec::as_slice)
    }

    pub fn stats(&self, id: &str) -> AccountStats {
        self.stats.get(id).copied().unwrap_or_default()
    }
}
