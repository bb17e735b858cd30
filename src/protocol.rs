//! Wire protocol shared by the WebSocket session and the HTTP endpoint.
//!
//! ## Messages
//!
//! ```text
//! inbound (ws)   { "largeComponents": [ { "adjacency_list": {..} }, .. ] }
//! inbound (http) { "adjacency_list": {..} }
//! outbound       { "type": "solution", "data": [ [..], .. ] }
//!                { "type": "error", "error": ".." }
//! ```
//!
//! Payloads are decoded here rather than by a framework extractor so that
//! both surfaces classify malformed input the same way.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Classify, ErrorClass};
use crate::pipeline::{BatchError, BatchPipeline};
use crate::solver::{panic_message, SolveError};
use crate::types::{Component, Path};

/// Inbound batch message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Components to solve, in order.
    #[serde(rename = "largeComponents")]
    pub large_components: Vec<Component>,
}

impl BatchRequest {
    /// Create a batch request.
    pub fn new(large_components: Vec<Component>) -> Self {
        Self { large_components }
    }
}

/// Outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseMessage {
    /// One path per input component, in input order.
    Solution {
        /// The verified paths.
        data: Vec<Path>,
    },
    /// A single failure description.
    Error {
        /// Client-facing message.
        error: String,
    },
}

impl ResponseMessage {
    /// A solution message.
    pub fn solution(data: Vec<Path>) -> Self {
        Self::Solution { data }
    }

    /// An error message with verbatim text.
    pub fn error(error: impl Into<String>) -> Self {
        Self::Error { error: error.into() }
    }

    /// An error message rendered for the failure's class.
    pub fn from_failure<E: Classify + ?Sized>(failure: &E) -> Self {
        Self::error(failure.client_message())
    }

    /// Whether this is an error message.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize response");
            r#"{"type":"error","error":"Internal error: response serialization failed"}"#
                .to_string()
        })
    }
}

/// Error type for undecodable payloads.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl Classify for DecodeError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Input
    }
}

/// Decode a batch message.
pub fn decode_batch(payload: &[u8]) -> Result<BatchRequest, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Decode a single-component body.
pub fn decode_component(payload: &[u8]) -> Result<Component, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Any failure while answering one inbound message.
#[derive(Debug, thiserror::Error)]
pub enum RequestFailure {
    /// The payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A batch failed.
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// A single component failed.
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// The blocking worker running the solve died.
    #[error("solver worker failed: {0}")]
    Worker(String),
}

impl Classify for RequestFailure {
    fn class(&self) -> ErrorClass {
        match self {
            Self::Decode(e) => e.class(),
            Self::Batch(e) => e.class(),
            Self::Solve(e) => e.class(),
            Self::Worker(_) => ErrorClass::Internal,
        }
    }
}

impl From<tokio::task::JoinError> for RequestFailure {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_panic() {
            Self::Worker(format!("panicked: {}", panic_message(e.into_panic().as_ref())))
        } else {
            Self::Worker(e.to_string())
        }
    }
}

/// Decode and solve a batch payload on the blocking pool.
pub async fn solve_batch_payload(
    pipeline: Arc<BatchPipeline>,
    payload: &[u8],
) -> Result<Vec<Path>, RequestFailure> {
    let request = decode_batch(payload)?;
    let paths = tokio::task::spawn_blocking(move || pipeline.solve_all(&request.large_components))
        .await??;
    Ok(paths)
}

/// Decode and solve a single-component payload on the blocking pool.
pub async fn solve_component_payload(
    pipeline: Arc<BatchPipeline>,
    payload: &[u8],
) -> Result<Path, RequestFailure> {
    let component = decode_component(payload)?;
    let path = tokio::task::spawn_blocking(move || pipeline.solve_one(&component)).await??;
    Ok(path)
}

/// Answer one batch payload with exactly one response message.
pub async fn respond_to_batch(pipeline: Arc<BatchPipeline>, payload: &[u8]) -> ResponseMessage {
    match solve_batch_payload(pipeline, payload).await {
        Ok(paths) => ResponseMessage::solution(paths),
        Err(failure) => {
            tracing::warn!(class = %failure.class(), error = %failure, "batch request failed");
            ResponseMessage::from_failure(&failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::AdaptiveOracle;

    fn pipeline() -> Arc<BatchPipeline> {
        Arc::new(BatchPipeline::with_oracle(Arc::new(AdaptiveOracle::default())))
    }

    #[test]
    fn test_solution_wire_shape() {
        let msg = ResponseMessage::solution(vec![vec!["A".into(), "B".into()]]);
        let json: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "solution", "data": [["A", "B"]]}));
    }

    #[test]
    fn test_error_wire_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&ResponseMessage::error("boom").to_json()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "error", "error": "boom"}));
    }

    #[test]
    fn test_decode_batch_uses_camel_case_key() {
        let req = decode_batch(br#"{"largeComponents": [{"adjacency_list": {"A": ["B"]}}]}"#)
            .unwrap();
        assert_eq!(req.large_components.len(), 1);

        assert!(decode_batch(br#"{"large_components": []}"#).is_err());
        assert!(decode_batch(b"not json").is_err());
    }

    #[test]
    fn test_decode_failure_is_input_class() {
        let err = decode_batch(b"{").unwrap_err();
        let failure = RequestFailure::from(err);
        assert_eq!(failure.class(), ErrorClass::Input);
        assert!(!failure.client_message().starts_with("Internal error"));
    }

    #[tokio::test]
    async fn test_respond_to_batch_success() {
        let payload = br#"{"largeComponents": [{"adjacency_list": {"A": ["B"], "B": ["A"]}}]}"#;
        let msg = respond_to_batch(pipeline(), payload).await;
        match msg {
            ResponseMessage::Solution { data } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].len(), 2);
            }
            other => panic!("expected solution, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_respond_to_batch_missing_adjacency() {
        let payload = br#"{"largeComponents": [{"adjacency_list": {}}]}"#;
        let msg = respond_to_batch(pipeline(), payload).await;
        assert_eq!(msg, ResponseMessage::error("Component missing 'adjacency_list'"));
    }

    #[tokio::test]
    async fn test_solve_component_payload() {
        let path = solve_component_payload(pipeline(), br#"{"adjacency_list": {"A": ["B"]}}"#)
            .await
            .unwrap();
        assert_eq!(path.len(), 2);
    }
}
