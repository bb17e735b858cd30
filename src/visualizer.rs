//! Visualizer hand-off for solved components.
//!
//! Rendering is a fire-and-forget side effect. The pipeline calls
//! [`render_isolated`] after a component is verified; whatever the visualizer
//! does, including returning an error or panicking, the already computed
//! response is unaffected.
//!
//! Each call carries a fresh [`ArtifactId`]. There is no shared counter, so
//! concurrent connections never coordinate on artifact naming.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Adjacency, Path};

/// Unique name for one rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A verified (adjacency, path) pair ready for rendering.
#[derive(Debug, Clone)]
pub struct Artifact<'a> {
    /// Per-call unique identifier.
    pub id: ArtifactId,
    /// Adjacency listing of the solved component.
    pub adjacency: &'a Adjacency,
    /// The verified path.
    pub path: &'a Path,
    /// When the component was solved.
    pub solved_at: DateTime<Utc>,
}

impl<'a> Artifact<'a> {
    /// Create an artifact with a fresh id stamped now.
    pub fn new(adjacency: &'a Adjacency, path: &'a Path) -> Self {
        Self {
            id: ArtifactId::generate(),
            adjacency,
            path,
            solved_at: Utc::now(),
        }
    }
}

/// Error type for visualizer failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VisualizerError {
    /// Rendering failed.
    #[error("Rendering failed: {0}")]
    Render(String),
}

/// Consumer of solved paths.
pub trait Visualizer: Send + Sync {
    /// Render one artifact.
    fn render(&self, artifact: &Artifact<'_>) -> Result<(), VisualizerError>;
}

/// Hand `artifact` to `visualizer`, logging and discarding any failure.
///
/// Returns whether rendering succeeded, for metrics only.
pub fn render_isolated(visualizer: &dyn Visualizer, artifact: &Artifact<'_>) -> bool {
    match catch_unwind(AssertUnwindSafe(|| visualizer.render(artifact))) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(artifact_id = %artifact.id, error = %e, "visualizer failed");
            false
        }
        Err(_) => {
            tracing::warn!(artifact_id = %artifact.id, "visualizer panicked");
            false
        }
    }
}

/// Visualizer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn render(&self, _artifact: &Artifact<'_>) -> Result<(), VisualizerError> {
        Ok(())
    }
}

/// Visualizer that emits one structured log event per artifact.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingVisualizer;

impl Visualizer for TracingVisualizer {
    fn render(&self, artifact: &Artifact<'_>) -> Result<(), VisualizerError> {
        tracing::info!(
            target: "longpath_kernel::artifacts",
            artifact_id = %artifact.id,
            nodes = artifact.adjacency.len(),
            path_len = artifact.path.len(),
            solved_at = %artifact.solved_at.to_rfc3339(),
            "solved path artifact"
        );
        Ok(())
    }
}

/// Owned copy of a rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedArtifact {
    /// Artifact identifier.
    pub id: ArtifactId,
    /// Adjacency listing.
    pub adjacency: Adjacency,
    /// Rendered path.
    pub path: Path,
}

/// In-memory visualizer for testing.
///
/// Records every artifact it receives. A failing recorder still records,
/// then reports an error.
#[derive(Debug, Default)]
pub struct RecordingVisualizer {
    artifacts: Mutex<Vec<RecordedArtifact>>,
    fail: bool,
}

impl RecordingVisualizer {
    /// Recorder that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that always reports a rendering error.
    pub fn failing() -> Self {
        Self {
            artifacts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Snapshot of recorded artifacts, in call order.
    pub fn artifacts(&self) -> Vec<RecordedArtifact> {
        self.artifacts.lock().clone()
    }

    /// Number of recorded artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.lock().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.artifacts.lock().is_empty()
    }
}

impl Visualizer for RecordingVisualizer {
    fn render(&self, artifact: &Artifact<'_>) -> Result<(), VisualizerError> {
        self.artifacts.lock().push(RecordedArtifact {
            id: artifact.id,
            adjacency: artifact.adjacency.clone(),
            path: artifact.path.clone(),
        });
        if self.fail {
            return Err(VisualizerError::Render("recorder configured to fail".to_string()));
        }
        Ok(())
    }
}
