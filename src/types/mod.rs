//! Core value types shared by the solver, the protocol and the service.

pub mod component;
pub mod edge;

pub use component::{Adjacency, Component, NodeId, Path};
pub use edge::Edge;
