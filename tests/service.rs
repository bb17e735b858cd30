//! HTTP surface tests driven through the router without a socket.

#![cfg(feature = "service")]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use longpath_kernel::{
    create_router, BatchPipeline, Edge, OracleError, Path, PathOracle, ServiceConfig,
    ServiceState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

struct StubOracle(Vec<&'static str>);

impl PathOracle for StubOracle {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct BrokenOracle;

impl PathOracle for BrokenOracle {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn find_path(&self, _edges: &[Edge]) -> Result<Path, OracleError> {
        Err(OracleError::NoPath {
            oracle: "broken",
            reason: "No valid path found".to_string(),
        })
    }
}

fn app_with(oracle: impl PathOracle + 'static) -> Router {
    let pipeline = BatchPipeline::with_oracle(Arc::new(oracle));
    create_router(ServiceState::new(pipeline, ServiceConfig::default()))
}

async fn post_solve(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/solve")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

const ABC: &str = r#"{"adjacency_list": {"A": ["B"], "B": ["A", "C"], "C": ["B"]}}"#;

#[tokio::test]
async fn test_solve_returns_one_element_solution() {
    let (status, body) = post_solve(app_with(StubOracle(vec!["A", "B", "C"])), ABC).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"type": "solution", "data": [["A", "B", "C"]]}));
}

#[tokio::test]
async fn test_solve_invalid_path_is_server_side_validation_error() {
    let (status, body) = post_solve(app_with(StubOracle(vec!["A", "C"])), ABC).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"], r#"Solution returned but is invalid: ["A", "C"]"#);
}

#[tokio::test]
async fn test_solve_empty_adjacency_is_input_error() {
    let (status, body) =
        post_solve(app_with(StubOracle(vec![])), r#"{"adjacency_list": {}}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"type": "error", "error": "Component missing 'adjacency_list'"}));
}

#[tokio::test]
async fn test_solve_malformed_body_is_structured() {
    let (status, body) = post_solve(app_with(StubOracle(vec![])), "[1, 2").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "error");
}

#[tokio::test]
async fn test_solve_oracle_failure_is_internal_error() {
    let (status, body) = post_solve(app_with(BrokenOracle), ABC).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Internal error: "), "got {}", error);
    assert!(error.contains("No valid path found"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let config = ServiceConfig {
        max_message_bytes: 32,
        ..ServiceConfig::default()
    };
    let pipeline = BatchPipeline::with_oracle(Arc::new(StubOracle(vec!["A", "B", "C"])));
    let app = create_router(ServiceState::new(pipeline, config));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/solve")
                .header("content-type", "application/json")
                .header("content-length", ABC.len())
                .body(Body::from(ABC))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health_reports_oracle() {
    let response = app_with(StubOracle(vec![]))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["oracle"], "stub");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_liveness_probe() {
    let response = app_with(StubOracle(vec![]))
        .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
