//! Branch-and-bound longest simple path search.

use std::collections::VecDeque;

use crate::graph::IndexedGraph;
use crate::types::{Edge, Path};
use super::{OracleError, PathOracle, DEFAULT_EXPANSION_BUDGET};

/// Exhaustive DFS over simple paths from every start node.
///
/// ## Bound
///
/// A branch ending at `tail` can grow by at most the number of unvisited
/// nodes reachable from `tail` through unvisited nodes. Branches whose
/// length plus that bound cannot beat the incumbent are pruned.
///
/// The search stops as soon as a Hamiltonian path is found. If the
/// expansion budget is exhausted it returns the incumbent, which is still a
/// valid simple path but may not be the longest.
#[derive(Debug, Clone)]
pub struct BranchAndBoundOracle {
    expansion_budget: u64,
}

impl BranchAndBoundOracle {
    /// Create an oracle that gives up improving after `expansion_budget` DFS steps.
    pub fn new(expansion_budget: u64) -> Self {
        Self { expansion_budget }
    }

    /// Search an indexed graph, returning node indices.
    pub(crate) fn search(&self, graph: &IndexedGraph) -> Vec<usize> {
        let n = graph.node_count();
        let mut search = Search {
            graph,
            visited: vec![false; n],
            path: Vec::with_capacity(n),
            best: Vec::new(),
            expansions: 0,
            budget: self.expansion_budget,
            queue: VecDeque::with_capacity(n),
            mark: vec![false; n],
        };

        // Low-degree nodes are likely path endpoints; try them first.
        let mut starts: Vec<usize> = (0..n).collect();
        starts.sort_by_key(|&i| (graph.degree(i), i));

        for start in starts {
            if search.best.len() == n || search.exhausted() {
                break;
            }
            search.explore(start);
        }

        if search.exhausted() {
            tracing::debug!(
                budget = self.expansion_budget,
                best_len = search.best.len(),
                "exact search budget exhausted"
            );
        }

        search.best
    }
}

impl Default for BranchAndBoundOracle {
    fn default() -> Self {
        Self::new(DEFAULT_EXPANSION_BUDGET)
    }
}

impl PathOracle for BranchAndBoundOracle {
    fn name(&self) -> &'static str {
        "branch_and_bound"
    }

    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError> {
        let graph = IndexedGraph::from_edges(edges);
        Ok(graph.to_path(&self.search(&graph)))
    }
}

/// A node on the DFS stack and the next neighbor slot to try from it.
struct Frame {
    node: usize,
    next: usize,
}

struct Search<'g> {
    graph: &'g IndexedGraph,
    visited: Vec<bool>,
    path: Vec<usize>,
    best: Vec<usize>,
    expansions: u64,
    budget: u64,
    // Scratch space for the reachability bound.
    queue: VecDeque<usize>,
    mark: Vec<bool>,
}

impl Search<'_> {
    fn exhausted(&self) -> bool {
        self.expansions >= self.budget
    }

    fn done(&self) -> bool {
        self.best.len() == self.graph.node_count() || self.exhausted()
    }

    /// Depth-first search over simple paths starting at `start`.
    ///
    /// Uses an explicit frame stack, so path length never grows the
    /// thread stack.
    fn explore(&mut self, start: usize) {
        self.enter(start);
        let first = self.first_choice(start);
        let mut frames = vec![Frame { node: start, next: first }];

        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            if self.done() || frame.next >= self.graph.degree(node) {
                frames.pop();
                self.leave(node);
                continue;
            }

            let next = self.graph.neighbors(node)[frame.next];
            frame.next += 1;
            if self.visited[next] {
                continue;
            }

            self.enter(next);
            let first = self.first_choice(next);
            frames.push(Frame { node: next, next: first });
        }
    }

    fn enter(&mut self, node: usize) {
        self.visited[node] = true;
        self.path.push(node);
    }

    fn leave(&mut self, node: usize) {
        self.path.pop();
        self.visited[node] = false;
    }

    /// Count an expansion of the current tail and record it as the incumbent
    /// if it is longer. Returns the first neighbor slot to try, or the
    /// tail's degree when the branch is pruned.
    fn first_choice(&mut self, tail: usize) -> usize {
        self.expansions += 1;

        if self.path.len() > self.best.len() {
            self.best.clone_from(&self.path);
        }

        let degree = self.graph.degree(tail);
        if self.done() || self.path.len() + self.reachable_from(tail) <= self.best.len() {
            return degree;
        }
        0
    }

    /// Unvisited nodes reachable from `tail` without crossing visited ones.
    fn reachable_from(&mut self, tail: usize) -> usize {
        self.mark.iter_mut().for_each(|m| *m = false);
        self.queue.clear();
        self.queue.push_back(tail);
        self.mark[tail] = true;

        let mut count = 0;
        while let Some(u) = self.queue.pop_front() {
            for &v in self.graph.neighbors(u) {
                if !self.visited[v] && !self.mark[v] {
                    self.mark[v] = true;
                    count += 1;
                    self.queue.push_back(v);
                }
            }
        }
        count
    }
}
