//! Graph model: edge derivation and the dense view used by path search.

use std::collections::{HashMap, HashSet};

use crate::types::{Adjacency, Edge, NodeId, Path};

/// Derive the deduplicated undirected edge list of an adjacency map.
///
/// Nodes are visited in the map's iteration order and neighbors in listed
/// order; each canonical pair is emitted the first time it is seen. An edge
/// listed from both endpoints, or listed twice from one, appears once.
///
/// ```
/// use longpath_kernel::{derive_edges, Component, Edge};
///
/// let c = Component::from_listing([("A", vec!["B"]), ("B", vec!["A", "C"]), ("C", vec!["B"])]);
/// let edges = derive_edges(c.adjacency().unwrap());
/// assert_eq!(edges, vec![Edge::new("A", "B"), Edge::new("B", "C")]);
/// ```
pub fn derive_edges(adjacency: &Adjacency) -> Vec<Edge> {
    let mut seen: HashSet<Edge> = HashSet::new();
    let mut edges = Vec::new();

    for (node, neighbors) in adjacency {
        for neighbor in neighbors {
            let edge = Edge::new(node.as_str(), neighbor.as_str());
            if seen.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Dense, index-based view of an edge list.
///
/// Node identifiers are interned in order of first appearance. Neighbor
/// lists are deduplicated and never contain the node itself.
#[derive(Debug, Clone, Default)]
pub struct IndexedGraph {
    names: Vec<NodeId>,
    neighbors: Vec<Vec<usize>>,
}

impl IndexedGraph {
    /// Build from an edge list. Loop edges still register their node.
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut graph = Self::default();

        for edge in edges {
            let (u, v) = edge.endpoints();
            let ui = graph.intern(&mut index, u);
            let vi = graph.intern(&mut index, v);
            if ui != vi && !graph.neighbors[ui].contains(&vi) {
                graph.neighbors[ui].push(vi);
                graph.neighbors[vi].push(ui);
            }
        }

        graph
    }

    fn intern<'e>(&mut self, index: &mut HashMap<&'e str, usize>, name: &'e str) -> usize {
        *index.entry(name).or_insert_with(|| {
            self.names.push(name.to_string());
            self.neighbors.push(Vec::new());
            self.names.len() - 1
        })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Neighbors of node `i`.
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Degree of node `i`.
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    /// Identifier of node `i`.
    pub fn name(&self, i: usize) -> &str {
        &self.names[i]
    }

    /// Translate an index path back to node identifiers.
    pub fn to_path(&self, indices: &[usize]) -> Path {
        indices.iter().map(|&i| self.names[i].clone()).collect()
    }
}
