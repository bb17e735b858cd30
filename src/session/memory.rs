//! In-memory session channel for testing.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::protocol::ResponseMessage;
use super::{ChannelError, Inbound, SessionChannel};

/// Server half of an in-memory duplex channel.
#[derive(Debug)]
pub struct MemoryChannel {
    inbound: mpsc::UnboundedReceiver<Result<Inbound, ChannelError>>,
    outbound: mpsc::UnboundedSender<ResponseMessage>,
}

/// Client half of an in-memory duplex channel.
///
/// Frames are queued immediately, so a test can script a whole
/// conversation before the session starts running.
#[derive(Debug)]
pub struct MemoryClient {
    inbound: mpsc::UnboundedSender<Result<Inbound, ChannelError>>,
    outbound: mpsc::UnboundedReceiver<ResponseMessage>,
}

/// Create a connected (server, client) pair.
pub fn memory_channel() -> (MemoryChannel, MemoryClient) {
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    (
        MemoryChannel {
            inbound: in_rx,
            outbound: out_tx,
        },
        MemoryClient {
            inbound: in_tx,
            outbound: out_rx,
        },
    )
}

#[async_trait]
impl SessionChannel for MemoryChannel {
    async fn recv(&mut self) -> Option<Result<Inbound, ChannelError>> {
        self.inbound.recv().await
    }

    async fn send(&mut self, message: &ResponseMessage) -> Result<(), ChannelError> {
        self.outbound
            .send(message.clone())
            .map_err(|_| ChannelError::Send("client stopped reading".to_string()))
    }
}

impl MemoryClient {
    /// Queue a text frame.
    pub fn send_text(&self, text: impl Into<String>) {
        self.push(Inbound::Text(text.into()));
    }

    /// Queue a binary frame.
    pub fn send_binary(&self, bytes: impl Into<Vec<u8>>) {
        self.push(Inbound::Binary(bytes.into()));
    }

    /// Queue a keep-alive frame.
    pub fn ping(&self) {
        self.push(Inbound::Ping);
    }

    /// Queue a close frame.
    pub fn close(&self) {
        self.push(Inbound::Close);
    }

    /// Queue a transport failure; the session's next read returns it.
    pub fn fail_receive(&self, reason: impl Into<String>) {
        self.queue(Err(ChannelError::Receive(reason.into())));
    }

    /// Stop accepting responses; later sends from the session fail.
    pub fn stop_reading(&mut self) {
        self.outbound.close();
    }

    /// Next response, or `None` once the session has gone away.
    pub async fn next_response(&mut self) -> Option<ResponseMessage> {
        self.outbound.recv().await
    }

    fn push(&self, frame: Inbound) {
        self.queue(Ok(frame));
    }

    fn queue(&self, item: Result<Inbound, ChannelError>) {
        if self.inbound.send(item).is_err() {
            tracing::debug!("session already gone, frame dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_arrive_in_order() {
        let (mut server, client) = memory_channel();
        client.send_text("a");
        client.send_binary(b"b".to_vec());
        client.close();

        assert_eq!(server.recv().await.unwrap().unwrap(), Inbound::Text("a".into()));
        assert_eq!(server.recv().await.unwrap().unwrap(), Inbound::Binary(b"b".to_vec()));
        assert_eq!(server.recv().await.unwrap().unwrap(), Inbound::Close);
    }

    #[tokio::test]
    async fn test_injected_receive_failure_is_returned() {
        let (mut server, client) = memory_channel();
        client.fail_receive("connection reset");

        let result = server.recv().await.unwrap();
        assert!(matches!(result, Err(ChannelError::Receive(reason)) if reason == "connection reset"));
    }

    #[tokio::test]
    async fn test_send_fails_after_stop_reading() {
        let (mut server, mut client) = memory_channel();
        client.stop_reading();

        let result = server.send(&ResponseMessage::error("x")).await;
        assert!(matches!(result, Err(ChannelError::Send(_))));
    }
}
