//! Component, adjacency and path types.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique within a component.
pub type NodeId = String;

/// Ordered sequence of node identifiers.
///
/// A path is simple iff no identifier repeats. Paths of length 0 or 1
/// are valid by definition.
pub type Path = Vec<NodeId>;

/// Map from node identifier to its listed neighbors.
///
/// `BTreeMap` fixes the natural iteration order to sorted key order, which
/// keeps edge derivation deterministic for a given payload. Listings are
/// not required to be symmetric.
pub type Adjacency = BTreeMap<NodeId, Vec<NodeId>>;

/// One connected (assumed) subgraph submitted for solving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Adjacency listing. Absent and empty are both treated as missing input.
    #[serde(default)]
    pub adjacency_list: Option<Adjacency>,
}

impl Component {
    /// Create a component from an adjacency map.
    pub fn new(adjacency: Adjacency) -> Self {
        Self {
            adjacency_list: Some(adjacency),
        }
    }

    /// Build a component from `(node, neighbors)` listings.
    ///
    /// ```
    /// use longpath_kernel::Component;
    ///
    /// let c = Component::from_listing([("A", vec!["B"]), ("B", vec!["A"])]);
    /// assert_eq!(c.node_count(), 2);
    /// ```
    pub fn from_listing<I, K, N>(listing: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<N>)>,
        K: Into<NodeId>,
        N: Into<NodeId>,
    {
        let adjacency = listing
            .into_iter()
            .map(|(node, neighbors)| {
                (node.into(), neighbors.into_iter().map(Into::into).collect())
            })
            .collect();
        Self::new(adjacency)
    }

    /// The adjacency map, or `None` when it is absent or empty.
    pub fn adjacency(&self) -> Option<&Adjacency> {
        self.adjacency_list.as_ref().filter(|adj| !adj.is_empty())
    }

    /// Number of keyed nodes in the listing.
    pub fn node_count(&self) -> usize {
        self.adjacency_list.as_ref().map_or(0, |adj| adj.len())
    }
}

impl From<Adjacency> for Component {
    fn from(adjacency: Adjacency) -> Self {
        Self::new(adjacency)
    }
}
