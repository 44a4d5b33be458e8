//! Ring assembler & scorer (C5): converts detector outputs into fraud rings
//! and per-account suspicion scores.

use crate::smurfing::SmurfingPattern;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The four detectable pattern tags an account can accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    Cycle,
    FanIn,
    FanOut,
    Shell,
}

impl PatternTag {
    fn base_score(self) -> f64 {
        match self {
            PatternTag::Cycle => 85.0,
            PatternTag::FanIn => 65.0,
            PatternTag::FanOut => 65.0,
            PatternTag::Shell => 75.0,
        }
    }
}

/// One assembled fraud ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    pub ring_id: String,
    pub member_accounts: Vec<String>,
    pub pattern_type: String,
    pub risk_score: f64,
}

/// A suspicious account's final, sorted output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id: String,
    pub suspicion_score: f64,
    pub detected_patterns: Vec<PatternTag>,
    pub ring_id: String,
}

/// Running per-account accumulator while rings are being assembled.
#[derive(Debug)]
struct SuspicionRecord {
    patterns: HashSet<PatternTag>,
    ring_ids: HashSet<String>,
    temporal_factor: f64,
}

impl SuspicionRecord {
    fn new() -> Self {
        Self {
            patterns: HashSet::new(),
            ring_ids: HashSet::new(),
            temporal_factor: 1.0,
        }
    }
}

struct RingCounter(u32);

impl RingCounter {
    fn next_id(&mut self) -> String {
        self.0 += 1;
        format!("RING_{:03}", self.0)
    }
}

/// Assembles rings and computes suspicion scores from the three detectors'
/// raw outputs, in the fixed order: cycles, fan-in, fan-out, shells.
///
/// Besides the sorted account list and the rings, returns every account's
/// full ring-id set (not just the primary one carried in
/// `SuspiciousAccount::ring_id`) for the visualization projector (C6), which
/// needs the complete set per spec section 4.6.
pub fn assemble(
    cycles: &[Vec<String>],
    fan_in: &[SmurfingPattern],
    fan_out: &[SmurfingPattern],
    shells: &[Vec<String>],
) -> (Vec<SuspiciousAccount>, Vec<FraudRing>, HashMap<String, Vec<String>>) {
    let mut counter = RingCounter(0);
    let mut rings = Vec::new();
    let mut records: HashMap<String, SuspicionRecord> = HashMap::new();

    for cycle in cycles {
        let ring_id = counter.next_id();
        for account in cycle {
            let record = records.entry(account.clone()).or_insert_with(SuspicionRecord::new);
            record.patterns.insert(PatternTag::Cycle);
            record.ring_ids.insert(ring_id.clone());
        }
        rings.push(FraudRing {
            ring_id,
            member_accounts: cycle.clone(),
            pattern_type: "Circular Fund Routing".to_string(),
            risk_score: round2(90.0),
        });
    }

    for pattern in fan_in {
        let ring_id = counter.next_id();
        let members = members_of(pattern);
        apply_smurfing(&mut records, &members, PatternTag::FanIn, &ring_id, pattern.temporal_factor);
        rings.push(FraudRing {
            ring_id,
            member_accounts: members,
            pattern_type: "Smurfing (Fan-In)".to_string(),
            risk_score: round2(70.0 * pattern.temporal_factor),
        });
    }

    for pattern in fan_out {
        let ring_id = counter.next_id();
        let members = members_of(pattern);
        apply_smurfing(&mut records, &members, PatternTag::FanOut, &ring_id, pattern.temporal_factor);
        rings.push(FraudRing {
            ring_id,
            member_accounts: members,
            pattern_type: "Smurfing (Fan-Out)".to_string(),
            risk_score: round2(70.0 * pattern.temporal_factor),
        });
    }

    for chain in shells {
        let ring_id = counter.next_id();
        for account in chain {
            let record = records.entry(account.clone()).or_insert_with(SuspicionRecord::new);
            record.patterns.insert(PatternTag::Shell);
            record.ring_ids.insert(ring_id.clone());
        }
        rings.push(FraudRing {
            ring_id,
            member_accounts: chain.clone(),
            pattern_type: "Layered Shell Network".to_string(),
            risk_score: round2(80.0),
        });
    }

    let mut all_ring_ids: HashMap<String, Vec<String>> = HashMap::new();
    let mut accounts: Vec<SuspiciousAccount> = records
        .into_iter()
        .map(|(account_id, record)| {
            let raw: f64 = record.patterns.iter().map(|tag| tag.base_score()).sum();
            let score = (raw * record.temporal_factor).min(100.0);
            let mut ring_ids: Vec<String> = record.ring_ids.into_iter().collect();
            ring_ids.sort();
            let mut patterns: Vec<PatternTag> = record.patterns.into_iter().collect();
            patterns.sort_by_key(|t| format!("{t:?}"));

            all_ring_ids.insert(account_id.clone(), ring_ids.clone());

            SuspiciousAccount {
                account_id,
                suspicion_score: round2(score),
                detected_patterns: patterns,
                ring_id: ring_ids.into_iter().next().unwrap_or_else(|| "RING_000".to_string()),
            }
        })
        .collect();

    // Tie-break by account_id ascending: unspecified upstream (spec section 9,
    // open question 3), pinned down here for stable, deterministic output.
    accounts.sort_by(|a, b| {
        b.suspicion_score
            .partial_cmp(&a.suspicion_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });

    (accounts, rings, all_ring_ids)
}

fn members_of(pattern: &SmurfingPattern) -> Vec<String> {
    let mut members = Vec::with_capacity(pattern.counterparties.len() + 1);
    members.push(pattern.hub.clone());
    members.extend(pattern.counterparties.iter().cloned());
    members
}

fn apply_smurfing(
    records: &mut HashMap<String, SuspicionRecord>,
    members: &[String],
    tag: PatternTag,
    ring_id: &str,
    temporal_factor: f64,
) {
    for account in members {
        let record = records.entry(account.clone()).or_insert_with(SuspicionRecord::new);
        record.patterns.insert(tag);
        record.ring_ids.insert(ring_id.to_string());
        record.temporal_factor = record.temporal_factor.max(temporal_factor);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
