//! Axum routes for the solver service.

use axum::{
    body::Bytes,
    extract::{ws::WebSocketUpgrade, DefaultBodyLimit, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::{Classify, ErrorClass};
use crate::protocol::{solve_component_payload, ResponseMessage};
use crate::session::StreamingSession;
use crate::LONGPATH_KERNEL_SCHEMA_VERSION;

use super::middleware::record_session_metrics;
use super::state::ServiceState;
use super::ws::WsChannel;

// ============================================================================
// Response Types
// ============================================================================

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while serving.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Wire message schema version.
    pub schema_version: String,
    /// Oracle serving requests.
    pub oracle: String,
    /// WebSocket sessions currently open.
    pub active_sessions: usize,
    /// WebSocket sessions opened since start.
    pub total_sessions: u64,
    /// RFC 3339 start time.
    pub started_at: String,
    /// Seconds since start.
    pub uptime_seconds: i64,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always "alive".
    pub status: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Whether the service accepts work.
    pub ready: bool,
    /// Reason when not ready.
    pub details: Option<String>,
}

/// HTTP status used for a failure class.
///
/// Only input errors are the client's fault. A rejected oracle path is a
/// server failure even though its text is sent verbatim.
pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Input => StatusCode::BAD_REQUEST,
        ErrorClass::Validation | ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Solve one component synchronously.
///
/// The body is decoded by the shared protocol decoder, so malformed bodies
/// get the same structured `error` message as on the WebSocket.
async fn solve_handler(State(state): State<ServiceState>, body: Bytes) -> Response {
    match solve_component_payload(state.pipeline.clone(), &body).await {
        Ok(path) => (StatusCode::OK, Json(ResponseMessage::solution(vec![path]))).into_response(),
        Err(failure) => {
            let class = failure.class();
            tracing::warn!(class = %class, error = %failure, "solve request failed");
            (status_for(class), Json(ResponseMessage::from_failure(&failure))).into_response()
        }
    }
}

/// Upgrade to a streaming session.
async fn ws_handler(State(state): State<ServiceState>, ws: WebSocketUpgrade) -> Response {
    let max_message_bytes = state.config.max_message_bytes;
    ws.max_message_size(max_message_bytes)
        .on_upgrade(move |socket| async move {
            let _guard = state.sessions.open();
            let mut channel = WsChannel::new(socket);
            let summary = StreamingSession::new(state.pipeline.clone())
                .run(&mut channel)
                .await;
            record_session_metrics(&summary);
        })
}

/// Health check endpoint (detailed).
async fn health_handler(State(state): State<ServiceState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: LONGPATH_KERNEL_SCHEMA_VERSION.to_string(),
        oracle: state.pipeline.solver().oracle_name().to_string(),
        active_sessions: state.sessions.active(),
        total_sessions: state.sessions.total(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: uptime.num_seconds(),
    })
}

/// Liveness probe endpoint.
///
/// Returns 200 if the process is alive.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// The service has no external dependencies, so it is ready once routing.
async fn readiness_handler() -> Json<ReadinessResponse> {
    Json(ReadinessResponse {
        ready: true,
        details: None,
    })
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the solver service.
pub fn create_router(state: ServiceState) -> Router {
    let max_body = state.config.max_message_bytes;

    Router::new()
        // Solving
        .route("/solve", post(solve_handler))
        .route("/ws", get(ws_handler))
        // Health checks
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(
            ServiceBuilder::new()
                .layer(RequestBodyLimitLayer::new(max_body))
                .layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorClass::Input), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorClass::Validation), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorClass::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
