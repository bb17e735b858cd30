//! All-or-nothing batch solving.
//!
//! A batch either solves completely, in input order, or yields exactly one
//! error describing the first failing component. Paths solved before the
//! failure are discarded.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{Classify, ErrorClass};
use crate::oracle::PathOracle;
use crate::solver::{ComponentSolver, SolveError};
use crate::types::{Component, Path};
use crate::visualizer::{render_isolated, Artifact, NoopVisualizer, Visualizer};

/// First failure of a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source}")]
pub struct BatchError {
    /// Position of the failing component in the request.
    pub index: usize,
    /// Why it failed.
    pub source: SolveError,
}

impl Classify for BatchError {
    fn class(&self) -> ErrorClass {
        self.source.class()
    }
}

/// Solves batches of components with one shared solver.
///
/// Holds no per-request state, so one instance serves every connection.
#[derive(Clone)]
pub struct BatchPipeline {
    solver: ComponentSolver,
    visualizer: Arc<dyn Visualizer>,
}

impl BatchPipeline {
    /// Create a pipeline with a solver and a visualizer.
    pub fn new(solver: ComponentSolver, visualizer: Arc<dyn Visualizer>) -> Self {
        Self { solver, visualizer }
    }

    /// Create a pipeline around `oracle` with no visualizer.
    pub fn with_oracle(oracle: Arc<dyn PathOracle>) -> Self {
        Self::new(ComponentSolver::new(oracle), Arc::new(NoopVisualizer))
    }

    /// The component solver.
    pub fn solver(&self) -> &ComponentSolver {
        &self.solver
    }

    /// Solve one component and hand the verified result to the visualizer.
    pub fn solve_one(&self, component: &Component) -> Result<Path, SolveError> {
        let path = self.solver.solve(component)?;
        if let Some(adjacency) = component.adjacency() {
            render_isolated(self.visualizer.as_ref(), &Artifact::new(adjacency, &path));
        }
        Ok(path)
    }

    /// Solve every component in order, stopping at the first failure.
    ///
    /// Returns one path per component on success, or the first failure.
    /// Components after the failing one are never attempted.
    pub fn solve_all(&self, components: &[Component]) -> Result<Vec<Path>, BatchError> {
        let start = Instant::now();

        let result = components
            .iter()
            .enumerate()
            .map(|(index, component)| {
                self.solve_one(component)
                    .map_err(|source| BatchError { index, source })
            })
            .collect::<Result<Vec<_>, _>>();

        let latency_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(paths) => tracing::info!(
                target: "longpath_kernel::metrics",
                metric_type = "batch",
                components = components.len(),
                total_path_len = paths.iter().map(Vec::len).sum::<usize>(),
                latency_ms,
                "batch_solved"
            ),
            Err(e) => tracing::info!(
                target: "longpath_kernel::metrics",
                metric_type = "batch",
                components = components.len(),
                failed_index = e.index,
                error_class = %e.class(),
                latency_ms,
                "batch_failed"
            ),
        }

        result
    }
}

impl std::fmt::Debug for BatchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchPipeline")
            .field("solver", &self.solver)
            .finish_non_exhaustive()
    }
}
