//! Path oracles.
//!
//! An oracle turns an edge list into *some* simple path, ideally a long one.
//! Longest simple path is NP-hard, so oracles are pluggable and untrusted:
//! nothing they return reaches a client without passing the verifier.
//!
//! ## Shipped oracles
//!
//! | Oracle | Strategy | Output |
//! |--------|----------|--------|
//! | [`BranchAndBoundOracle`] | exhaustive DFS with reachability bound | optimal unless the expansion budget runs out |
//! | [`GreedyOracle`] | Warnsdorff-style extension from several starts | heuristic |
//! | [`AdaptiveOracle`] | exact below a node limit, greedy above | either |

mod exact;
mod greedy;

pub use exact::BranchAndBoundOracle;
pub use greedy::GreedyOracle;

use crate::graph::IndexedGraph;
use crate::types::{Edge, Path};

/// Default node count up to which [`AdaptiveOracle`] searches exhaustively.
pub const DEFAULT_EXACT_NODE_LIMIT: usize = 24;

/// Default number of DFS expansions before exact search settles for its best path.
pub const DEFAULT_EXPANSION_BUDGET: u64 = 2_000_000;

/// Error type for oracle failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The oracle could not produce a path.
    #[error("{oracle} found no path: {reason}")]
    NoPath {
        /// Oracle name.
        oracle: &'static str,
        /// Why no path was produced.
        reason: String,
    },

    /// The oracle panicked while searching.
    #[error("{oracle} panicked: {message}")]
    Panicked {
        /// Oracle name.
        oracle: &'static str,
        /// Panic payload, when it was a string.
        message: String,
    },
}

/// Capability that proposes a long simple path through an edge list.
///
/// Implementations must accept any edge list, including an empty one, and
/// should return a simple path (possibly empty). Callers assume neither
/// validity nor optimality.
pub trait PathOracle: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Propose a path through the graph described by `edges`.
    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError>;
}

impl<O: PathOracle + ?Sized> PathOracle for Box<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError> {
        (**self).find_path(edges)
    }
}

impl<O: PathOracle + ?Sized> PathOracle for std::sync::Arc<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError> {
        (**self).find_path(edges)
    }
}

/// Exact search for small components, greedy search for large ones.
#[derive(Debug, Clone)]
pub struct AdaptiveOracle {
    exact: BranchAndBoundOracle,
    greedy: GreedyOracle,
    exact_node_limit: usize,
}

impl AdaptiveOracle {
    /// Create an adaptive oracle.
    ///
    /// # Arguments
    /// * `exact_node_limit` - Largest component searched exhaustively
    /// * `expansion_budget` - DFS expansions allowed per exact search
    pub fn new(exact_node_limit: usize, expansion_budget: u64) -> Self {
        Self {
            exact: BranchAndBoundOracle::new(expansion_budget),
            greedy: GreedyOracle::new(),
            exact_node_limit,
        }
    }

    /// Node count up to which exact search is used.
    pub fn exact_node_limit(&self) -> usize {
        self.exact_node_limit
    }
}

impl Default for AdaptiveOracle {
    fn default() -> Self {
        Self::new(DEFAULT_EXACT_NODE_LIMIT, DEFAULT_EXPANSION_BUDGET)
    }
}

impl PathOracle for AdaptiveOracle {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn find_path(&self, edges: &[Edge]) -> Result<Path, OracleError> {
        let graph = IndexedGraph::from_edges(edges);
        let indices = if graph.node_count() <= self.exact_node_limit {
            tracing::debug!(nodes = graph.node_count(), "using exact search");
            self.exact.search(&graph)
        } else {
            tracing::debug!(nodes = graph.node_count(), "using greedy search");
            self.greedy.search(&graph)
        };
        Ok(graph.to_path(&indices))
    }
}
