//! Cycle detector (C2): enumerates simple directed cycles of length 3-5.

use crate::graph::Graph;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Caps total cycles returned so a pathologically dense graph degrades
/// gracefully instead of exhausting memory; crossing it counts as a
/// detector-internal failure per the recovery contract in spec section 4.2.
const MAX_CYCLES: usize = 200_000;

/// Enumerates elementary cycles whose length falls in `len_range` (inclusive
/// node count, so 3..=5 means 3-to-5-hop rings).
///
/// Rotational duplicates are suppressed by only ever starting the search
/// from the lexicographically smallest account in the cycle: an account
/// earlier in sorted order than the search's start can never appear in the
/// cycle, so the cycle is found exactly once, from its true minimum.
pub fn detect_cycles(graph: &Graph, len_range: RangeInclusive<usize>) -> Vec<Vec<String>> {
    let mut nodes: Vec<&String> = graph.nodes().iter().collect();
    nodes.sort();

    let mut cycles = Vec::new();
    for start in &nodes {
        let mut path = vec![(*start).clone()];
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert((*start).clone());

        if !search(graph, start, start, &mut path, &mut visited, &len_range, &mut cycles) {
            log::error!("cycle detector aborted: exceeded {MAX_CYCLES} cycles, returning empty list");
            return Vec::new();
        }
    }

    cycles
}

/// Returns `false` if the search had to be aborted (cap exceeded).
fn search(
    graph: &Graph,
    start: &str,
    current: &str,
    path: &mut Vec<String>,
    visited: &mut HashSet<String>,
    len_range: &RangeInclusive<usize>,
    out: &mut Vec<Vec<String>>,
) -> bool {
    for next in graph.successors(current) {
        if next.as_str() == start {
            if path.len() >= *len_range.start() && path.len() <= *len_range.end() {
                out.push(path.clone());
                if out.len() > MAX_CYCLES {
                    return false;
                }
            }
            continue;
        }

        if next.as_str() < start || visited.contains(next) {
            continue;
        }
        if path.len() + 1 > *len_range.end() {
            continue;
        }

        visited.insert(next.clone());
        path.push(next.clone());
        let ok = search(graph, start, next, path, visited, len_range, out);
        path.pop();
        visited.remove(next);

        if !ok {
            return false;
        }
    }
    true
}
