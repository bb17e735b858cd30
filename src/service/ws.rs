//! WebSocket transport for streaming sessions.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};

use crate::protocol::ResponseMessage;
use crate::session::{ChannelError, Inbound, SessionChannel};

/// Adapts an axum [`WebSocket`] to a [`SessionChannel`].
pub struct WsChannel {
    socket: WebSocket,
}

impl WsChannel {
    /// Wrap an upgraded socket.
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

/// Map a WebSocket frame onto the session's frame type.
pub fn inbound_from_message(message: Message) -> Inbound {
    match message {
        Message::Text(text) => Inbound::Text(text),
        Message::Binary(bytes) => Inbound::Binary(bytes),
        Message::Ping(_) | Message::Pong(_) => Inbound::Ping,
        Message::Close(_) => Inbound::Close,
    }
}

#[async_trait]
impl SessionChannel for WsChannel {
    async fn recv(&mut self) -> Option<Result<Inbound, ChannelError>> {
        self.socket.recv().await.map(|frame| {
            frame
                .map(inbound_from_message)
                .map_err(|e| ChannelError::Receive(e.to_string()))
        })
    }

    async fn send(&mut self, message: &ResponseMessage) -> Result<(), ChannelError> {
        self.socket
            .send(Message::Text(message.to_json()))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}
