//! Service state management.
//!
//! Contains the shared pipeline, configuration and session accounting.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ServiceConfig;
use crate::oracle::AdaptiveOracle;
use crate::pipeline::BatchPipeline;
use crate::solver::ComponentSolver;
use crate::visualizer::{TracingVisualizer, Visualizer};

/// Live and lifetime session counts.
///
/// The only cross-connection mutable state in the service; atomics keep it
/// consistent without locks.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active: AtomicUsize,
    total: AtomicU64,
}

impl SessionRegistry {
    /// Record a session opening and return a guard that records its end.
    pub fn open(self: &Arc<Self>) -> SessionGuard {
        self.active.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(1, Ordering::Relaxed);
        SessionGuard {
            registry: Arc::clone(self),
        }
    }

    /// Sessions currently open.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Sessions opened since start.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

/// Decrements the active count when dropped.
#[derive(Debug)]
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Shared service state.
///
/// Cheap to clone; every connection shares one pipeline.
#[derive(Debug, Clone)]
pub struct ServiceState {
    /// Solver pipeline shared by all connections.
    pub pipeline: Arc<BatchPipeline>,
    /// Runtime configuration.
    pub config: Arc<ServiceConfig>,
    /// Session accounting.
    pub sessions: Arc<SessionRegistry>,
    /// When the service started.
    pub started_at: DateTime<Utc>,
}

impl ServiceState {
    /// Create state around an existing pipeline.
    pub fn new(pipeline: BatchPipeline, config: ServiceConfig) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
            sessions: Arc::new(SessionRegistry::default()),
            started_at: Utc::now(),
        }
    }

    /// Build the production pipeline from configuration.
    ///
    /// Uses the adaptive oracle and logs solved artifacts through tracing.
    pub fn from_config(config: ServiceConfig) -> Self {
        let oracle = AdaptiveOracle::new(config.exact_node_limit, config.expansion_budget);
        let visualizer: Arc<dyn Visualizer> = Arc::new(TracingVisualizer);
        let pipeline = BatchPipeline::new(ComponentSolver::new(Arc::new(oracle)), visualizer);
        Self::new(pipeline, config)
    }
}
