//! Single-component solver.
//!
//! Composes edge derivation, an untrusted oracle and the verifier. The
//! solver fails closed: a path the verifier rejects is an error, never a
//! result.
//!
//! ## Algorithm
//!
//! 1. Reject components with an absent or empty adjacency listing
//! 2. Derive the deduplicated edge list
//! 3. Ask the oracle for a path (errors and panics are captured)
//! 4. Verify the path against the original listing
//! 5. Return the oracle's path unchanged

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::canonical::ComponentFingerprint;
use crate::error::{Classify, ErrorClass};
use crate::graph::derive_edges;
use crate::oracle::{OracleError, PathOracle};
use crate::types::{Component, Path};
use crate::verifier::{check, PathViolation};

/// Error type for solving one component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// The component has no adjacency listing.
    #[error("Component missing 'adjacency_list'")]
    MissingAdjacency,

    /// The oracle failed or panicked.
    #[error("Path search failed: {0}")]
    Oracle(#[from] OracleError),

    /// The oracle's path failed verification.
    #[error("Solution returned but is invalid: {path:?}")]
    InvalidPath {
        /// The rejected path, as returned by the oracle.
        path: Path,
        /// The first rule it broke.
        violation: PathViolation,
    },
}

impl Classify for SolveError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::MissingAdjacency => ErrorClass::Input,
            Self::InvalidPath { .. } => ErrorClass::Validation,
            Self::Oracle(_) => ErrorClass::Internal,
        }
    }
}

/// Solves one component with an injected oracle.
#[derive(Clone)]
pub struct ComponentSolver {
    oracle: Arc<dyn PathOracle>,
}

impl ComponentSolver {
    /// Create a solver around `oracle`.
    pub fn new(oracle: Arc<dyn PathOracle>) -> Self {
        Self { oracle }
    }

    /// Name of the injected oracle.
    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Solve `component`, returning a verified simple path.
    pub fn solve(&self, component: &Component) -> Result<Path, SolveError> {
        let adjacency = component.adjacency().ok_or(SolveError::MissingAdjacency)?;
        let fingerprint = ComponentFingerprint::of(adjacency);
        let start = Instant::now();

        let edges = derive_edges(adjacency);
        let path = self.call_oracle(&edges)?;

        if let Err(violation) = check(adjacency, &path) {
            tracing::warn!(
                oracle = self.oracle.name(),
                fingerprint = %fingerprint,
                violation = %violation,
                "oracle path rejected by verifier"
            );
            return Err(SolveError::InvalidPath { path, violation });
        }

        tracing::debug!(
            oracle = self.oracle.name(),
            fingerprint = %fingerprint,
            nodes = adjacency.len(),
            edges = edges.len(),
            path_len = path.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "component solved"
        );
        Ok(path)
    }

    fn call_oracle(&self, edges: &[crate::types::Edge]) -> Result<Path, OracleError> {
        let oracle = self.oracle.as_ref();
        match catch_unwind(AssertUnwindSafe(|| oracle.find_path(edges))) {
            Ok(result) => result,
            Err(payload) => Err(OracleError::Panicked {
                oracle: oracle.name(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

impl std::fmt::Debug for ComponentSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSolver")
            .field("oracle", &self.oracle.name())
            .finish()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    /// Oracle that returns a fixed path regardless of input.
    struct FixedOracle(Vec<&'static str>);

    impl PathOracle for FixedOracle {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct FailingOracle;

    impl PathOracle for FailingOracle {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
            Err(OracleError::NoPath {
                oracle: "failing",
                reason: "Empty edge list".to_string(),
            })
        }
    }

    struct PanickingOracle;

    impl PathOracle for PanickingOracle {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
            panic!("search blew up");
        }
    }

    fn line() -> Component {
        Component::from_listing([("A", vec!["B"]), ("B", vec!["A", "C"]), ("C", vec!["B"])])
    }

    fn solver(oracle: impl PathOracle + 'static) -> ComponentSolver {
        ComponentSolver::new(Arc::new(oracle))
    }

    #[test]
    fn test_valid_oracle_path_returned_unchanged() {
        let path = solver(FixedOracle(vec!["C", "B", "A"])).solve(&line()).unwrap();
        assert_eq!(path, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_invalid_oracle_path_fails_closed() {
        let err = solver(FixedOracle(vec!["A", "C"])).solve(&line()).unwrap_err();

        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.to_string(), r#"Solution returned but is invalid: ["A", "C"]"#);
        assert!(matches!(
            err,
            SolveError::InvalidPath { violation: PathViolation::MissingEdge { .. }, .. }
        ));
    }

    #[test]
    fn test_missing_adjacency_is_input_error() {
        let err = solver(FixedOracle(vec![])).solve(&Component::default()).unwrap_err();
        assert_eq!(err, SolveError::MissingAdjacency);
        assert_eq!(err.client_message(), "Component missing 'adjacency_list'");
    }

    #[test]
    fn test_oracle_error_is_internal() {
        let err = solver(FailingOracle).solve(&line()).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(err.client_message().starts_with("Internal error: "));
    }

    #[test]
    fn test_oracle_panic_is_captured() {
        let err = solver(PanickingOracle).solve(&line()).unwrap_err();
        assert_eq!(
            err,
            SolveError::Oracle(OracleError::Panicked {
                oracle: "panicking",
                message: "search blew up".to_string(),
            })
        );
    }

    #[test]
    fn test_isolated_node_component_yields_empty_path() {
        let component = Component::from_listing([("A", Vec::<&str>::new())]);
        let path = solver(crate::oracle::AdaptiveOracle::default())
            .solve(&component)
            .unwrap();
        assert!(path.is_empty());
    }
}
