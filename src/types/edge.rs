//! Undirected edge type.

use serde::{Deserialize, Serialize};
use super::component::NodeId;

/// Undirected edge between two nodes of a component.
///
/// Endpoints are stored in canonical order (`a <= b`), so `{a, b}` and
/// `{b, a}` compare and hash identically. Serializes as a two-element
/// array, the shape the oracle capability consumes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeId, NodeId)", into = "(NodeId, NodeId)")]
pub struct Edge {
    a: NodeId,
    b: NodeId,
}

impl Edge {
    /// Create an edge, canonicalizing the endpoint order.
    pub fn new(u: impl Into<NodeId>, v: impl Into<NodeId>) -> Self {
        let (u, v) = (u.into(), v.into());
        if u <= v {
            Self { a: u, b: v }
        } else {
            Self { a: v, b: u }
        }
    }

    /// Both endpoints, smaller first.
    pub fn endpoints(&self) -> (&str, &str) {
        (&self.a, &self.b)
    }

    /// Whether both endpoints are the same node.
    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }

    /// Whether `node` is one of the endpoints.
    pub fn touches(&self, node: &str) -> bool {
        self.a == node || self.b == node
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((u, v): (NodeId, NodeId)) -> Self {
        Self::new(u, v)
    }
}

impl From<Edge> for (NodeId, NodeId) {
    fn from(edge: Edge) -> Self {
        (edge.a, edge.b)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}--{}", self.a, self.b)
    }
}
