//! Greedy path growth for components too large for exhaustive search.

use std::collections::VecDeque;

use crate::graph::IndexedGraph;
use crate::types::{Edge, Path};
use super::{OracleError, PathOracle};

/// Default number of start nodes tried per search.
pub const DEFAULT_START_CANDIDATES: usize = 16;

/// Warnsdorff-style path growth.
///
/// From each start candidate the path is extended at the tail, always
/// stepping to the unvisited neighbor with the fewest unvisited neighbors,
/// then extended at the head the same way. The longest result wins.
///
/// Start candidates are the lowest-degree nodes plus the far end of a BFS
/// sweep, which tends to sit on the periphery of maze-like graphs.
#[derive(Debug, Clone)]
pub struct GreedyOracle {
    start_candidates: usize,
}

impl GreedyOracle {
    /// Create a greedy oracle with the default number of start candidates.
    pub fn new() -> Self {
        Self::with_start_candidates(DEFAULT_START_CANDIDATES)
    }

    /// Create a greedy oracle that tries up to `start_candidates` starts.
    pub fn with_start_candidates(start_candidates: usize) -> Self {
        Self {
            start_candidates: start_candidates.max(1),
        }
    }

    pub(crate) fn search(&self, graph: &IndexedGraph) -> Vec<usize> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        let mut starts: Vec<usize> = (0..n).collect();
        starts.sort_by_key(|&i| (graph.degree(i), i));
        starts.truncate(self.start_candidates);
        let far = farthest_from(graph, starts[0]);
        if !starts.contains(&far) {
            starts.push(far);
        }

        let mut best: Vec<usize> = Vec::new();
        let mut visited = vec![false; n];
        for start in starts {
            visited.iter_mut().for_each(|v| *v = false);
            let path = grow(graph, start, &mut visited);
            if path.len() > best.len() {
                best = path;
            }
            if best.len() == n {
                break;
            }
        }
        best
    }
}

impl Default for GreedyOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PathOracle for GreedyOracle {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError> {
        let graph = IndexedGraph::from_edges(edges);
        Ok(graph.to_path(&self.search(&graph)))
    }
}

fn grow(graph: &IndexedGraph, start: usize, visited: &mut [bool]) -> Vec<usize> {
    let mut path: VecDeque<usize> = VecDeque::new();
    path.push_back(start);
    visited[start] = true;

    while let Some(next) = path.back().and_then(|&tail| pick_next(graph, tail, visited)) {
        visited[next] = true;
        path.push_back(next);
    }
    while let Some(next) = path.front().and_then(|&head| pick_next(graph, head, visited)) {
        visited[next] = true;
        path.push_front(next);
    }

    path.into_iter().collect()
}

fn pick_next(graph: &IndexedGraph, from: usize, visited: &[bool]) -> Option<usize> {
    graph
        .neighbors(from)
        .iter()
        .copied()
        .filter(|&v| !visited[v])
        .min_by_key(|&v| {
            let onward = graph.neighbors(v).iter().filter(|&&w| !visited[w]).count();
            (onward, v)
        })
}

fn farthest_from(graph: &IndexedGraph, source: usize) -> usize {
    let mut seen = vec![false; graph.node_count()];
    let mut queue = VecDeque::from([source]);
    seen[source] = true;

    let mut last = source;
    while let Some(u) = queue.pop_front() {
        last = u;
        for &v in graph.neighbors(u) {
            if !seen[v] {
                seen[v] = true;
                queue.push_back(v);
            }
        }
    }
    last
}
