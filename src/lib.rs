//! # Money Muling Detection Engine
//!
//! A graph-based engine for flagging suspicious structural patterns in a
//! batch of directed monetary transactions: closed fund-routing cycles,
//! smurfing fan-in/fan-out hubs, and layered chains through low-activity
//! shell intermediaries.
//!
//! ## Pipeline
//!
//! - **Transaction Graph**: aggregates multi-transactions into weighted
//!   edges with per-account activity counters.
//! - **Cycle Detector**: enumerates simple directed cycles of length 3-5.
//! - **Smurfing Detector**: flags fan-in/fan-out hubs with temporal
//!   clustering.
//! - **Shell-Chain Detector**: enumerates simple directed paths through
//!   low-activity intermediaries.
//! - **Ring Assembler & Scorer**: unifies detector outputs into ranked
//!   accounts and labeled fraud rings.
//! - **Visualization Projector**: emits a node/edge graph projection
//!   annotated with suspicion flags.
//!
//! The engine is single-threaded and synchronous: one call to [`analyze`]
//! processes one batch end-to-end and retains no state afterward.

pub mod cycles;
pub mod graph;
pub mod scoring;
pub mod shells;
pub mod smurfing;
pub mod visualization;

pub use graph::{AccountStats, Edge, Graph, Transaction, TxRecord};
pub use scoring::{FraudRing, PatternTag, SuspiciousAccount};
pub use smurfing::SmurfingPattern;
pub use visualization::{GraphData, GraphEdge, GraphNode};

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Instant;
use thiserror::Error;

/// Detector-internal failures. Input validation (schema/parse errors) is a
/// collaborator-side concern upstream of this crate and has no
/// representation here; a detector that hits this path logs and degrades to
/// an empty result rather than propagating, per the recovery contract each
/// detector documents.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("detector failed internally: {0}")]
    DetectorInternal(String),
}

/// Tunable thresholds for the detectors, mirroring their defaults from the
/// detection contracts.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum distinct connections for a node to count as a fan-in/fan-out hub.
    pub min_connections: usize,
    /// Minimum edge count for a shell chain.
    pub min_hops: usize,
    /// Inclusive cycle length range (node count).
    pub cycle_len_range: RangeInclusive<usize>,
    /// Maximum edge count explored while enumerating shell-chain candidates.
    pub shell_path_cutoff: usize,
    /// Inclusive total_transactions range that defines a "shell" account.
    pub shell_activity_range: (usize, usize),
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_connections: 10,
            min_hops: 3,
            cycle_len_range: 3..=5,
            shell_path_cutoff: 6,
            shell_activity_range: (2, 3),
        }
    }
}

/// Summary counters for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_accounts_analyzed: usize,
    pub suspicious_accounts_flagged: usize,
    pub fraud_rings_detected: usize,
    pub processing_time_seconds: f64,
}

/// The full output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    pub fraud_rings: Vec<FraudRing>,
    pub summary: AnalysisSummary,
    pub graph_data: GraphData,
}

/// Runs the full detection pipeline over a validated batch of transactions
/// using default thresholds. See [`analyze`] to customize them.
pub fn analyze_default(transactions: &[Transaction]) -> AnalysisResult {
    analyze(transactions, &DetectorConfig::default())
}

/// Runs the full detection pipeline: builds the graph (C1), runs the three
/// detectors (C2-C4), assembles rings and scores (C5), and projects the
/// visualization graph (C6).
///
/// A zero-transaction batch succeeds with an empty suspicious list, empty
/// rings, and a zero-filled summary (spec section 7, `Empty`).
pub fn analyze(transactions: &[Transaction], config: &DetectorConfig) -> AnalysisResult {
    let start = Instant::now();

    let graph = Graph::load(transactions);

    let cycles = cycles::detect_cycles(&graph, config.cycle_len_range.clone());
    let (fan_in, fan_out) = smurfing::detect_smurfing(&graph, config.min_connections);
    let shells = shells::detect_shell_chains(
        &graph,
        config.min_hops,
        config.shell_path_cutoff,
        config.shell_activity_range,
    );

    let (suspicious_accounts, fraud_rings, all_ring_ids) =
        scoring::assemble(&cycles, &fan_in, &fan_out, &shells);

    let graph_data = visualization::project(&graph, &suspicious_accounts, &all_ring_ids);

    let summary = AnalysisSummary {
        total_accounts_analyzed: graph.nodes().len(),
        suspicious_accounts_flagged: suspicious_accounts.len(),
        fraud_rings_detected: fraud_rings.len(),
        processing_time_seconds: (start.elapsed().as_secs_f64() * 100.0).round() / 100.0,
    };

    AnalysisResult {
        suspicious_accounts,
        fraud_rings,
        summary,
        graph_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn tx(id: &str, from: &str, to: &str, amount: f64, ts: DateTime<Utc>) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            amount,
            timestamp: ts,
        }
    }

    #[test]
    fn empty_batch_succeeds_with_zeroed_summary() {
        let result = analyze_default(&[]);
        assert!(result.suspicious_accounts.is_empty());
        assert!(result.fraud_rings.is_empty());
        assert_eq!(result.summary.total_accounts_analyzed, 0);
        assert_eq!(result.summary.suspicious_accounts_flagged, 0);
        assert_eq!(result.summary.fraud_rings_detected, 0);
    }

    #[test]
    fn scenario_cycle_of_three() {
        let now = Utc::now();
        let result = analyze_default(&[
            tx("T1", "A", "B", 1000.0, now),
            tx("T2", "B", "C", 1000.0, now),
            tx("T3", "C", "A", 1000.0, now),
        ]);

        assert_eq!(result.fraud_rings.len(), 1);
        let ring = &result.fraud_rings[0];
        assert_eq!(ring.pattern_type, "Circular Fund Routing");
        assert_eq!(ring.risk_score, 90.0);
        let mut members = ring.member_accounts.clone();
        members.sort();
        assert_eq!(members, vec!["A", "B", "C"]);
        assert!(result.suspicious_accounts.iter().all(|a| a.suspicion_score == 85.0));
    }

    #[test]
    fn scenario_cycle_of_four() {
        // Every node in this loop sends once and receives once
        // (total_transactions == 2), so the shell-chain detector also fires
        // on paths around the same loop, an honest consequence of running
        // independent detectors over one graph, not a bug. The cycle ring
        // itself is still asserted precisely.
        let now = Utc::now();
        let result = analyze_default(&[
            tx("T1", "D", "E", 500.0, now),
            tx("T2", "E", "F", 500.0, now),
            tx("T3", "F", "G", 500.0, now),
            tx("T4", "G", "D", 500.0, now),
        ]);

        let cycle_ring = result
            .fraud_rings
            .iter()
            .find(|r| r.pattern_type == "Circular Fund Routing")
            .expect("cycle ring present");
        assert_eq!(cycle_ring.risk_score, 90.0);
        let mut members = cycle_ring.member_accounts.clone();
        members.sort();
        assert_eq!(members, vec!["D", "E", "F", "G"]);

        for account in &["D", "E", "F", "G"] {
            let record = result.suspicious_accounts.iter().find(|a| a.account_id == *account).unwrap();
            assert!(record.detected_patterns.contains(&PatternTag::Cycle));
            assert!(record.suspicion_score >= 85.0);
        }
    }

    #[test]
    fn scenario_fan_in_15_senders_within_72h() {
        let base = Utc::now();
        let mut txs = Vec::new();
        for i in 0..15 {
            txs.push(tx(
                &format!("T{i}"),
                &format!("S{i}"),
                "H",
                100.0,
                base + Duration::hours(i * 2),
            ));
        }
        let result = analyze_default(&txs);

        assert_eq!(result.fraud_rings.len(), 1);
        let ring = &result.fraud_rings[0];
        assert_eq!(ring.pattern_type, "Smurfing (Fan-In)");
        assert_eq!(ring.risk_score, 105.0);
        assert_eq!(ring.member_accounts.len(), 16);
        assert!(ring.member_accounts.contains(&"H".to_string()));

        let hub = result.suspicious_accounts.iter().find(|a| a.account_id == "H").unwrap();
        assert_eq!(hub.suspicion_score, 97.5);
        let sender = result.suspicious_accounts.iter().find(|a| a.account_id == "S0").unwrap();
        assert_eq!(sender.suspicion_score, 97.5);
    }

    #[test]
    fn scenario_fan_out_12_receivers_spanning_180h() {
        let base = Utc::now();
        let mut txs = Vec::new();
        for i in 0..12 {
            txs.push(tx(
                &format!("T{i}"),
                "D",
                &format!("R{i}"),
                100.0,
                base + Duration::hours(i * 16),
            ));
        }
        let result = analyze_default(&txs);

        assert_eq!(result.fraud_rings.len(), 1);
        let ring = &result.fraud_rings[0];
        assert_eq!(ring.pattern_type, "Smurfing (Fan-Out)");
        assert_eq!(ring.risk_score, 70.0);

        let disperser = result.suspicious_accounts.iter().find(|a| a.account_id == "D").unwrap();
        assert_eq!(disperser.suspicion_score, 65.0);
    }

    #[test]
    fn scenario_shell_chain_of_four_hops() {
        let now = Utc::now();
        let result = analyze_default(&[
            tx("T1", "S1", "S2", 100.0, now),
            tx("T2", "S2", "S3", 100.0, now),
            tx("T3", "S3", "S4", 100.0, now),
            tx("T4", "S4", "S5", 100.0, now),
        ]);

        let full_chain = vec!["S1", "S2", "S3", "S4", "S5"];
        let has_full_chain = result
            .fraud_rings
            .iter()
            .any(|r| r.pattern_type == "Layered Shell Network" && r.member_accounts == full_chain);
        assert!(has_full_chain);
        assert!(result
            .fraud_rings
            .iter()
            .filter(|r| r.pattern_type == "Layered Shell Network")
            .all(|r| r.risk_score == 80.0));

        for account in &["S1", "S2", "S3", "S4", "S5"] {
            let record = result.suspicious_accounts.iter().find(|a| a.account_id == *account).unwrap();
            assert_eq!(record.suspicion_score, 75.0);
        }
    }

    #[test]
    fn scenario_cross_signal_amplification() {
        let base = Utc::now();
        let mut txs = vec![
            tx("C1", "X", "B", 1000.0, base),
            tx("C2", "B", "C", 1000.0, base),
            tx("C3", "C", "X", 1000.0, base),
        ];
        for i in 0..10 {
            txs.push(tx(&format!("F{i}"), &format!("S{i}"), "X", 100.0, base + Duration::hours(i)));
        }

        let result = analyze_default(&txs);
        let x = result.suspicious_accounts.iter().find(|a| a.account_id == "X").unwrap();
        assert_eq!(x.suspicion_score, 100.0);
        assert!(x.detected_patterns.contains(&PatternTag::Cycle));
        assert!(x.detected_patterns.contains(&PatternTag::FanIn));
    }

    #[test]
    fn every_ring_member_has_exactly_one_suspicion_record() {
        let now = Utc::now();
        let result = analyze_default(&[
            tx("T1", "A", "B", 100.0, now),
            tx("T2", "B", "C", 100.0, now),
            tx("T3", "C", "A", 100.0, now),
        ]);

        for ring in &result.fraud_rings {
            for member in &ring.member_accounts {
                let matches = result
                    .suspicious_accounts
                    .iter()
                    .filter(|a| &a.account_id == member)
                    .count();
                assert_eq!(matches, 1);
            }
        }
    }

    #[test]
    fn ring_ids_are_unique_and_contiguous() {
        let base = Utc::now();
        let mut txs = vec![tx("C1", "A", "B", 1.0, base), tx("C2", "B", "C", 1.0, base), tx("C3", "C", "A", 1.0, base)];
        for i in 0..10 {
            txs.push(tx(&format!("F{i}"), &format!("S{i}"), "H", 1.0, base));
        }
        let result = analyze_default(&txs);

        let ids: Vec<&str> = result.fraud_rings.iter().map(|r| r.ring_id.as_str()).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, format!("RING_{:03}", i + 1));
        }
    }

    #[test]
    fn summary_counts_match_output_lengths() {
        let now = Utc::now();
        let result = analyze_default(&[tx("T1", "A", "B", 100.0, now), tx("T2", "B", "C", 100.0, now)]);

        assert_eq!(result.summary.total_accounts_analyzed, result.graph_data.nodes.len());
        assert_eq!(result.summary.suspicious_accounts_flagged, result.suspicious_accounts.len());
        assert_eq!(result.summary.fraud_rings_detected, result.fraud_rings.len());
    }

    #[test]
    fn output_is_deterministic_across_runs() {
        let base = Utc::now();
        let mut txs = vec![tx("C1", "A", "B", 1.0, base), tx("C2", "B", "C", 1.0, base), tx("C3", "C", "A", 1.0, base)];
        for i in 0..10 {
            txs.push(tx(&format!("F{i}"), &format!("S{i}"), "H", 1.0, base));
        }

        let first = analyze_default(&txs);
        let second = analyze_default(&txs);

        let first_ids: Vec<&str> = first.fraud_rings.iter().map(|r| r.ring_id.as_str()).collect();
        let second_ids: Vec<&str> = second.fraud_rings.iter().map(|r| r.ring_id.as_str()).collect();
        assert_eq!(first_ids, second_ids);

        let first_scores: Vec<f64> = first.suspicious_accounts.iter().map(|a| a.suspicion_score).collect();
        let second_scores: Vec<f64> = second.suspicious_accounts.iter().map(|a| a.suspicion_score).collect();
        assert_eq!(first_scores, second_scores);
    }
}
