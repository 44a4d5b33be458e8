//! Visualization projector (C6): emits the node/edge graph projection.

use crate::graph::Graph;
use crate::scoring::{PatternTag, SuspiciousAccount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub suspicious: bool,
    pub in_degree: usize,
    pub out_degree: usize,
    pub total_transactions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub total_amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Per-account extra data shown only for suspicious accounts.
struct SuspiciousInfo {
    patterns: Vec<PatternTag>,
    ring_ids: Vec<String>,
}

/// Projects the graph plus the scorer's account records into a
/// visualization-ready shape. Only aggregates are emitted; raw transaction
/// lists are never serialized here.
pub fn project(graph: &Graph, suspicious: &[SuspiciousAccount], all_ring_ids: &HashMap<String, Vec<String>>) -> GraphData {
    let info: HashMap<&str, SuspiciousInfo> = suspicious
        .iter()
        .map(|a| {
            (
                a.account_id.as_str(),
                SuspiciousInfo {
                    patterns: a.detected_patterns.clone(),
                    ring_ids: all_ring_ids.get(&a.account_id).cloned().unwrap_or_default(),
                },
            )
        })
        .collect();

    let nodes = graph
        .nodes()
        .iter()
        .map(|id| {
            let stats = graph.stats(id);
            let suspicious = info.get(id.as_str());
            GraphNode {
                id: id.clone(),
                label: id.clone(),
                suspicious: suspicious.is_some(),
                in_degree: stats.in_degree,
                out_degree: stats.out_degree,
                total_transactions: stats.total_transactions,
                patterns: suspicious.map(|s| s.patterns.clone()),
                ring_ids: suspicious.map(|s| s.ring_ids.clone()),
            }
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| GraphEdge {
            id: format!("{}-{}", edge.source, edge.target),
            source: edge.source.clone(),
            target: edge.target.clone(),
            total_amount: edge.total_amount,
            count: edge.count,
        })
        .collect();

    GraphData { nodes, edges }
}
