use async_trait::async_trait;
use thiserror::Error;

use domain::{ConnectionId, PairingEvent, Room};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessengerError {
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    #[error("send queue for connection {0} is full")]
    Backpressure(ConnectionId),

    #[error("room {0} not found")]
    RoomNotFound(Room),

    #[error("failed to encode event: {0}")]
    Serialization(String),
}

/// The real-time messaging layer pairing decisions are delivered through.
///
/// Implementations hand events off without waiting on the network, so a
/// client that stops reading never stalls delivery to anyone else.
#[async_trait]
pub trait RoomMessenger: Send + Sync {
    async fn emit(
        &self,
        connection_id: ConnectionId,
        event: &PairingEvent,
    ) -> Result<(), MessengerError>;

    async fn emit_to_room(
        &self,
        room: &Room,
        event: &PairingEvent,
    ) -> Result<(), MessengerError>;

    async fn join_room(
        &self,
        room: &Room,
        connection_id: ConnectionId,
    ) -> Result<(), MessengerError>;

    async fn close_room(
        &self,
        room: &Room,
    ) -> Result<(), MessengerError>;
}
