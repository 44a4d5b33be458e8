//! Shell-chain detector (C4): simple directed paths through low-activity
//! "shell" intermediaries.

use crate::graph::Graph;
use std::collections::{HashMap, HashSet};

/// Caps the number of chains returned, mirroring the cycle detector's
/// safeguard against combinatorial blowup on dense graphs.
const MAX_CHAINS: usize = 200_000;

/// Enumerates simple directed paths with `min_hops..=max_edges` edges whose
/// interior nodes all have `total_transactions` in `shell_range`.
///
/// Runs one DFS per source instead of a pairwise (source, target) search.
/// Equivalent output, and it avoids re-walking the same subtree once per
/// candidate target.
pub fn detect_shell_chains(
    graph: &Graph,
    min_hops: usize,
    max_edges: usize,
    shell_range: (usize, usize),
) -> Vec<Vec<String>> {
    let is_shell: HashMap<&str, bool> = graph
        .nodes()
        .iter()
        .map(|n| {
            let total = graph.stats(n).total_transactions;
            (n.as_str(), total >= shell_range.0 && total <= shell_range.1)
        })
        .collect();

    let mut chains = Vec::new();
    let mut seen: HashSet<Vec<String>> = HashSet::new();

    for source in graph.nodes() {
        let mut path = vec![source.clone()];
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(source.clone());

        if !walk(
            graph,
            &is_shell,
            source,
            &mut path,
            &mut visited,
            min_hops,
            max_edges,
            &mut seen,
            &mut chains,
        ) {
            log::error!("shell-chain detector aborted: exceeded {MAX_CHAINS} chains, returning empty list");
            return Vec::new();
        }
    }

    chains
}

#[allow(clippy::too_many_arguments)]
fn walk(
    graph: &Graph,
    is_shell: &HashMap<&str, bool>,
    source: &str,
    path: &mut Vec<String>,
    visited: &mut HashSet<String>,
    min_hops: usize,
    max_edges: usize,
    seen: &mut HashSet<Vec<String>>,
    out: &mut Vec<Vec<String>>,
) -> bool {
    let current = path.last().unwrap().clone();
    for next in graph.successors(&current) {
        if next == source || visited.contains(next) {
            continue;
        }

        let edges = path.len();
        if edges >= min_hops && seen.insert(append(path, next)) {
            out.push(append(path, next));
            if out.len() > MAX_CHAINS {
                return false;
            }
        }

        if edges < max_edges && *is_shell.get(next.as_str()).unwrap_or(&false) {
            visited.insert(next.clone());
            path.push(next.clone());
            let ok = walk(graph, is_shell, source, path, visited, min_hops, max_edges, seen, out);
            path.pop();
            visited.remove(next);
            if !ok {
                return false;
            }
        }
    }
    true
}

fn append(path: &[String], next: &str) -> Vec<String> {
    let mut p = path.to_vec();
    p.push(next.to_string());
    p
}
