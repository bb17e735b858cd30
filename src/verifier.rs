//! Independent path verification.
//!
//! The verifier is the only correctness gate between an untrusted oracle
//! and a client. It looks at nothing but the original adjacency listing and
//! the candidate path, so it certifies paths regardless of who produced them.
//!
//! ## Rules
//!
//! 1. Every consecutive pair of the path is joined by an edge. The listing
//!    is symmetrized first: `"A": ["B"]` makes both `A→B` and `B→A` walkable.
//! 2. No node identifier repeats.
//!
//! Paths with fewer than two nodes have no pairs and pass rule 1 trivially.

use std::collections::{HashMap, HashSet};

use crate::types::{Adjacency, NodeId};

/// The first rule a rejected path breaks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathViolation {
    /// `path[index]` and `path[index + 1]` are not adjacent.
    #[error("no edge between {from} and {to} at position {index}")]
    MissingEdge {
        /// Position of the first node of the pair.
        index: usize,
        /// First node of the pair.
        from: NodeId,
        /// Second node of the pair.
        to: NodeId,
    },

    /// A node appears more than once.
    #[error("node {node} repeats at positions {first} and {second}")]
    RepeatedNode {
        /// The repeated identifier.
        node: NodeId,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the second occurrence.
        second: usize,
    },
}

/// Symmetrized neighbor lookup built from an adjacency listing.
#[derive(Debug, Clone, Default)]
pub struct PathVerifier<'a> {
    lookup: HashMap<&'a str, HashSet<&'a str>>,
}

impl<'a> PathVerifier<'a> {
    /// Build the undirected lookup for `adjacency`.
    pub fn new(adjacency: &'a Adjacency) -> Self {
        let mut lookup: HashMap<&'a str, HashSet<&'a str>> = HashMap::new();
        for (node, neighbors) in adjacency {
            for neighbor in neighbors {
                lookup.entry(node.as_str()).or_default().insert(neighbor.as_str());
                lookup.entry(neighbor.as_str()).or_default().insert(node.as_str());
            }
        }
        Self { lookup }
    }

    /// Whether `u` and `v` are joined by a listed edge, in either direction.
    pub fn has_edge(&self, u: &str, v: &str) -> bool {
        self.lookup.get(u).is_some_and(|ns| ns.contains(v))
    }

    /// Check `path`, reporting the first violated rule.
    ///
    /// Edges are checked before distinctness, and the walk stops at the
    /// first missing edge.
    pub fn check(&self, path: &[NodeId]) -> Result<(), PathViolation> {
        for (index, pair) in path.windows(2).enumerate() {
            if !self.has_edge(&pair[0], &pair[1]) {
                return Err(PathViolation::MissingEdge {
                    index,
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                });
            }
        }

        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(path.len());
        for (second, node) in path.iter().enumerate() {
            if let Some(&first) = positions.get(node.as_str()) {
                return Err(PathViolation::RepeatedNode {
                    node: node.clone(),
                    first,
                    second,
                });
            }
            positions.insert(node.as_str(), second);
        }

        Ok(())
    }
}

/// Check `path` against `adjacency`, reporting the first violated rule.
pub fn check(adjacency: &Adjacency, path: &[NodeId]) -> Result<(), PathViolation> {
    PathVerifier::new(adjacency).check(path)
}

/// Whether `path` is a simple path over existing edges of `adjacency`.
///
/// ```
/// use longpath_kernel::{verify, Component};
///
/// let c = Component::from_listing([("A", vec!["B"]), ("B", vec!["A", "C"]), ("C", vec!["B"])]);
/// let adj = c.adjacency().unwrap();
/// let path: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
/// assert!(verify(adj, &path));
/// assert!(!verify(adj, &["A".to_string(), "C".to_string()]));
/// ```
pub fn verify(adjacency: &Adjacency, path: &[NodeId]) -> bool {
    check(adjacency, path).is_ok()
}
