//! Long-lived streaming sessions.
//!
//! A session answers every inbound batch with exactly one response and keeps
//! going after failures. Only a close frame, the end of the stream, or a
//! broken transport ends it.
//!
//! ## States
//!
//! ```text
//!          connect
//!             │
//!             ▼
//!   ┌───▶  Open  ──── close / end / recv error / send error ───▶ Closed
//!   │         │
//!   │   message received
//!   │         ▼
//!   └─── Processing
//!     response sent
//! ```
//!
//! Messages on one session are handled strictly one at a time: the next
//! frame is not read until the previous response has been sent.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::pipeline::BatchPipeline;
use crate::protocol::{respond_to_batch, ResponseMessage};

pub use memory::{memory_channel, MemoryChannel, MemoryClient};

/// One inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// UTF-8 text payload.
    Text(String),
    /// Binary payload, decoded as JSON bytes.
    Binary(Vec<u8>),
    /// Transport keep-alive; ignored.
    Ping,
    /// Client asked to close.
    Close,
}

/// Error type for transport failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChannelError {
    /// Reading the next frame failed.
    #[error("receive failed: {0}")]
    Receive(String),
    /// Writing a response failed, usually because the peer went away.
    #[error("send failed: {0}")]
    Send(String),
}

/// Duplex transport a session runs over.
#[async_trait]
pub trait SessionChannel: Send {
    /// Wait for the next frame. `None` means the stream has ended.
    async fn recv(&mut self) -> Option<Result<Inbound, ChannelError>>;

    /// Send one response.
    async fn send(&mut self, message: &ResponseMessage) -> Result<(), ChannelError>;
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the next inbound message.
    Open,
    /// Solving a batch; no frames are read.
    Processing,
    /// Finished; nothing more is sent.
    Closed,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The client sent a close frame.
    ClientClosed,
    /// The inbound stream ended without a close frame.
    StreamEnded,
    /// Reading failed.
    ReceiveFailed(String),
    /// Sending a response failed.
    SendFailed(String),
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub session_id: Uuid,
    /// Payload frames received.
    pub messages_received: u64,
    /// `solution` messages delivered.
    pub solutions_sent: u64,
    /// `error` messages delivered.
    pub errors_sent: u64,
    /// Why the session ended.
    pub close_reason: CloseReason,
}

/// One client's session.
#[derive(Debug)]
pub struct StreamingSession {
    id: Uuid,
    pipeline: Arc<BatchPipeline>,
    state: SessionState,
    messages_received: u64,
    solutions_sent: u64,
    errors_sent: u64,
}

impl StreamingSession {
    /// Open a session backed by a shared pipeline.
    pub fn new(pipeline: Arc<BatchPipeline>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pipeline,
            state: SessionState::Open,
            messages_received: 0,
            solutions_sent: 0,
            errors_sent: 0,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Serve `channel` until it closes.
    pub async fn run<C: SessionChannel + ?Sized>(mut self, channel: &mut C) -> SessionSummary {
        let span = tracing::info_span!("session", session_id = %self.id);
        async move {
            tracing::info!("session opened");
            let close_reason = self.serve(channel).await;
            self.transition(SessionState::Closed);

            let summary = SessionSummary {
                session_id: self.id,
                messages_received: self.messages_received,
                solutions_sent: self.solutions_sent,
                errors_sent: self.errors_sent,
                close_reason,
            };
            tracing::info!(
                messages_received = summary.messages_received,
                solutions_sent = summary.solutions_sent,
                errors_sent = summary.errors_sent,
                close_reason = ?summary.close_reason,
                "session closed"
            );
            summary
        }
        .instrument(span)
        .await
    }

    async fn serve<C: SessionChannel + ?Sized>(&mut self, channel: &mut C) -> CloseReason {
        loop {
            let payload = match channel.recv().await {
                None => return CloseReason::StreamEnded,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "receive failed");
                    return CloseReason::ReceiveFailed(e.to_string());
                }
                Some(Ok(Inbound::Close)) => return CloseReason::ClientClosed,
                Some(Ok(Inbound::Ping)) => continue,
                Some(Ok(Inbound::Text(text))) => text.into_bytes(),
                Some(Ok(Inbound::Binary(bytes))) => bytes,
            };

            self.transition(SessionState::Processing);
            self.messages_received += 1;

            let response = respond_to_batch(Arc::clone(&self.pipeline), &payload).await;

            if let Err(e) = channel.send(&response).await {
                tracing::warn!(error = %e, "client went away before the response was sent");
                return CloseReason::SendFailed(e.to_string());
            }
            if response.is_error() {
                self.errors_sent += 1;
            } else {
                self.solutions_sent += 1;
            }
            self.transition(SessionState::Open);
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(from = ?self.state, to = ?next, "session state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::AdaptiveOracle;

    fn session() -> StreamingSession {
        StreamingSession::new(Arc::new(BatchPipeline::with_oracle(Arc::new(
            AdaptiveOracle::default(),
        ))))
    }

    #[test]
    fn test_new_session_is_open() {
        assert_eq!(session().state(), SessionState::Open);
    }

    #[tokio::test]
    async fn test_close_frame_ends_session() {
        let (mut channel, client) = memory_channel();
        client.close();

        let summary = session().run(&mut channel).await;
        assert_eq!(summary.close_reason, CloseReason::ClientClosed);
        assert_eq!(summary.messages_received, 0);
    }

    #[tokio::test]
    async fn test_dropped_client_ends_stream() {
        let (mut channel, client) = memory_channel();
        drop(client);

        let summary = session().run(&mut channel).await;
        assert_eq!(summary.close_reason, CloseReason::StreamEnded);
    }

    #[tokio::test]
    async fn test_ping_is_ignored() {
        let (mut channel, mut client) = memory_channel();
        client.ping();
        client.send_text(r#"{"largeComponents": []}"#);
        client.close();

        let summary = session().run(&mut channel).await;
        assert_eq!(summary.messages_received, 1);
        assert_eq!(client.next_response().await, Some(ResponseMessage::solution(vec![])));
    }
}
