//! # longpath-kernel
//!
//! Verified long-path solving for maze components.
//!
//! The kernel answers one question per component:
//!
//! > Which simple path through this graph should the client draw?
//!
//! ## Core Contract
//!
//! 1. Derive a deduplicated undirected edge list from an adjacency listing
//! 2. Ask a pluggable, **untrusted** oracle for a long simple path
//! 3. **Verify** the path against the original listing and fail closed
//! 4. Solve batches all-or-nothing, in order
//! 5. Serve batches over a session that survives per-message failures
//!
//! ## Architecture
//!
//! ```text
//! Component → derive_edges → PathOracle → verify → BatchPipeline → ResponseMessage
//!                                                        ↑
//!                               StreamingSession (WebSocket) / POST /solve
//! ```
//!
//! ## Error Classes
//!
//! - Input: missing adjacency or undecodable payload (verbatim)
//! - Validation: oracle path rejected by the verifier (verbatim)
//! - Internal: oracle failure or worker crash (`Internal error: ` prefix)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod verifier;
pub mod oracle;
pub mod solver;
pub mod pipeline;
pub mod visualizer;
pub mod protocol;
pub mod session;
pub mod canonical;
pub mod config;
pub mod error;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{Adjacency, Component, Edge, NodeId, Path};
pub use graph::{derive_edges, IndexedGraph};
pub use verifier::{check, verify, PathVerifier, PathViolation};
pub use oracle::{AdaptiveOracle, BranchAndBoundOracle, GreedyOracle, OracleError, PathOracle};
pub use solver::{ComponentSolver, SolveError};
pub use pipeline::{BatchError, BatchPipeline};
pub use visualizer::{
    ArtifactId, Artifact, Visualizer, VisualizerError,
    NoopVisualizer, TracingVisualizer, RecordingVisualizer, RecordedArtifact,
};
pub use protocol::{BatchRequest, ResponseMessage, DecodeError, RequestFailure};
pub use session::{
    StreamingSession, SessionChannel, SessionState, SessionSummary, CloseReason,
    Inbound, ChannelError, MemoryChannel, MemoryClient, memory_channel,
};
pub use canonical::{canonical_hash, canonical_hash_hex, ComponentFingerprint};
pub use config::{ServiceConfig, ConfigError, LogFormat};
pub use error::{Classify, ErrorClass};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Schema version of the wire messages.
/// Increment on breaking changes to any message shape.
pub const LONGPATH_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
