//! Golden tests for the solve–verify–aggregate pipeline.
//!
//! These tests pin the end-to-end behavior clients rely on: exact paths
//! for stub oracles, error texts, and all-or-nothing batches.

use std::sync::Arc;

use longpath_kernel::{
    derive_edges, verify, Adjacency, AdaptiveOracle, BatchPipeline, Classify, Component,
    ComponentSolver, Edge, ErrorClass, OracleError, Path, PathOracle, RecordingVisualizer,
    SolveError,
};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Oracle stub that returns a fixed path.
struct StubOracle(Vec<&'static str>);

impl PathOracle for StubOracle {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

fn abc() -> Component {
    Component::from_listing([("A", vec!["B"]), ("B", vec!["A", "C"]), ("C", vec!["B"])])
}

fn pipeline(oracle: impl PathOracle + 'static) -> BatchPipeline {
    BatchPipeline::with_oracle(Arc::new(oracle))
}

fn strings(nodes: &[&str]) -> Path {
    nodes.iter().map(|s| s.to_string()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// End-to-end
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stub_path_returned_exactly() {
    let path = pipeline(StubOracle(vec!["A", "B", "C"])).solve_one(&abc()).unwrap();
    assert_eq!(path, strings(&["A", "B", "C"]));
}

#[test]
fn test_stub_path_without_edge_names_path_in_error() {
    let err = pipeline(StubOracle(vec!["A", "C"])).solve_one(&abc()).unwrap_err();

    assert_eq!(err.class(), ErrorClass::Validation);
    let message = err.client_message();
    assert!(message.contains(r#"["A", "C"]"#), "message was {}", message);
}

#[test]
fn test_empty_adjacency_in_batch_fails_whole_batch() {
    let batch = vec![abc(), Component::new(Adjacency::new()), abc()];
    let err = pipeline(AdaptiveOracle::default()).solve_all(&batch).unwrap_err();

    assert_eq!(err.index, 1);
    assert_eq!(err.source, SolveError::MissingAdjacency);
    assert_eq!(err.class(), ErrorClass::Input);
    assert!(err.client_message().contains("adjacency_list"));
}

#[test]
fn test_valid_invalid_valid_yields_single_error() {
    // The stub path is valid for A-B-C but not for the star component.
    let star = Component::from_listing([("A", vec!["X"]), ("B", vec!["X"]), ("C", vec!["X"])]);
    let recorder = Arc::new(RecordingVisualizer::new());
    let pipeline = BatchPipeline::new(
        ComponentSolver::new(Arc::new(StubOracle(vec!["A", "B", "C"]))),
        recorder.clone(),
    );

    let result = pipeline.solve_all(&[abc(), star, abc()]);

    let err = result.unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(recorder.len(), 1);
}

#[test]
fn test_real_oracle_solves_hex_like_component() {
    // Two fused hexagons sharing the edge c-d.
    let component = Component::from_listing([
        ("a", vec!["b", "f"]),
        ("b", vec!["a", "c"]),
        ("c", vec!["b", "d", "g"]),
        ("d", vec!["c", "e", "j"]),
        ("e", vec!["d", "f"]),
        ("f", vec!["e", "a"]),
        ("g", vec!["c", "h"]),
        ("h", vec!["g", "i"]),
        ("i", vec!["h", "j"]),
        ("j", vec!["i", "d"]),
    ]);

    let path = pipeline(AdaptiveOracle::default()).solve_one(&component).unwrap();

    assert_eq!(path.len(), 10);
    assert!(verify(component.adjacency().unwrap(), &path));
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

fn arb_adjacency() -> impl Strategy<Value = Adjacency> {
    prop::collection::btree_map(
        "[a-h]",
        prop::collection::vec("[a-h]", 0..5),
        0..8,
    )
}

proptest! {
    #[test]
    fn prop_derived_edges_are_unique_and_complete(adj in arb_adjacency()) {
        let edges = derive_edges(&adj);

        let unique: std::collections::HashSet<&Edge> = edges.iter().collect();
        prop_assert_eq!(unique.len(), edges.len());

        for (node, neighbors) in &adj {
            for neighbor in neighbors {
                prop_assert!(edges.contains(&Edge::new(node.as_str(), neighbor.as_str())));
            }
        }
    }

    #[test]
    fn prop_degenerate_paths_always_verify(adj in arb_adjacency(), node in "[a-h]") {
        prop_assert!(verify(&adj, &[]));
        prop_assert!(verify(&adj, &[node]));
    }

    #[test]
    fn prop_repeated_node_never_verifies(adj in arb_adjacency(), node in "[a-h]") {
        let path = vec![node.clone(), node];
        prop_assert!(!verify(&adj, &path));
    }

    #[test]
    fn prop_oracle_output_always_verifies(adj in arb_adjacency()) {
        prop_assume!(!adj.is_empty());
        let component = Component::new(adj.clone());

        let path = pipeline(AdaptiveOracle::default()).solve_one(&component).unwrap();
        prop_assert!(verify(&adj, &path));
    }
}
