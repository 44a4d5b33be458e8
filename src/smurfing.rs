//! Smurfing detector (C3): fan-in / fan-out hubs with temporal clustering.

use crate::graph::Graph;
use serde::{Deserialize, Serialize};

/// One fan-in or fan-out hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmurfingPattern {
    /// The aggregator (fan-in) or disperser (fan-out) account.
    pub hub: String,
    /// The senders (fan-in) or receivers (fan-out) incident to the hub.
    pub counterparties: Vec<String>,
    pub count: usize,
    /// 1.5 if the incident transactions cluster within a 72-hour window, else 1.0.
    pub temporal_factor: f64,
}

const TEMPORAL_WINDOW_HOURS: f64 = 72.0;

/// Detects fan-in and fan-out hubs. A node may appear in both lists.
pub fn detect_smurfing(graph: &Graph, min_connections: usize) -> (Vec<SmurfingPattern>, Vec<SmurfingPattern>) {
    let mut fan_in = Vec::new();
    let mut fan_out = Vec::new();

    for node in graph.nodes() {
        let stats = graph.stats(node);

        if stats.in_degree >= min_connections {
            let senders = graph.predecessors(node).to_vec();
            if let Some(factor) = temporal_factor(graph, &senders, node, Direction::Incoming) {
                fan_in.push(SmurfingPattern {
                    hub: node.clone(),
                    counterparties: senders,
                    count: stats.in_degree,
                    temporal_factor: factor,
                });
            }
        }

        if stats.out_degree >= min_connections {
            let receivers = graph.successors(node).to_vec();
            if let Some(factor) = temporal_factor(graph, &receivers, node, Direction::Outgoing) {
                fan_out.push(SmurfingPattern {
                    hub: node.clone(),
                    counterparties: receivers,
                    count: stats.out_degree,
                    temporal_factor: factor,
                });
            }
        }
    }

    (fan_in, fan_out)
}

enum Direction {
    Incoming,
    Outgoing,
}

/// Gathers timestamps from every edge between `node` and each of
/// `counterparties`, and derives the temporal factor from their span. Returns
/// `None` when there are no timestamps to measure (the node is then not
/// emitted), per the edge case in spec section 4.3.
fn temporal_factor(graph: &Graph, counterparties: &[String], node: &str, dir: Direction) -> Option<f64> {
    let mut timestamps = Vec::new();
    for other in counterparties {
        let edge = match dir {
            Direction::Incoming => graph.edge(other, node),
            Direction::Outgoing => graph.edge(node, other),
        };
        if let Some(edge) = edge {
            timestamps.extend(edge.transactions.iter().map(|t| t.timestamp));
        }
    }

    if timestamps.is_empty() {
        return None;
    }

    timestamps.sort();
    let span_hours = (timestamps[timestamps.len() - 1] - timestamps[0]).num_seconds() as f64 / 3600.0;
    Some(if span_hours <= TEMPORAL_WINDOW_HOURS { 1.5 } else { 1.0 })
}
