use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::SinkExt;
use futures::stream::SplitSink;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use application::ports::out_::{MessengerError, RoomMessenger};
use domain::{ConnectionId, PairingEvent, Room};

pub(crate) type WebSocketSender = SplitSink<WebSocket, Message>;

/// Events queued per connection before further sends are refused.
pub const OUTBOX_CAPACITY: usize = 64;

/// Delivers pairing events over live WebSocket connections and keeps the
/// room membership used for room broadcasts.
///
/// Each connection has a bounded outbox drained by its own writer task, so
/// sending only ever enqueues.
pub struct WebSocketMessenger {
    outboxes: RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>,
    rooms: RwLock<HashMap<Room, Vec<ConnectionId>>>,
}

impl WebSocketMessenger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            outboxes: RwLock::new(HashMap::new()),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register_connection(
        &self,
        connection_id: ConnectionId,
        mut sender: WebSocketSender,
    ) {
        let mut outbox = self.open_outbox(connection_id).await;
        tokio::spawn(async move {
            while let Some(message) = outbox.recv().await {
                if let Err(e) = sender.send(Message::Text(message.into())).await {
                    debug!(connection_id = %connection_id, error = %e, "Writer stopped");
                    break;
                }
            }
        });
    }

    async fn open_outbox(
        &self,
        connection_id: ConnectionId,
    ) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(OUTBOX_CAPACITY);
        self.outboxes.write().await.insert(connection_id, tx);
        rx
    }

    /// Drops the outbox, which ends the writer task once it drains.
    pub async fn unregister_connection(
        &self,
        connection_id: ConnectionId,
    ) {
        self.outboxes.write().await.remove(&connection_id);
        self.rooms.write().await.retain(|_, members| {
            members.retain(|id| *id != connection_id);
            !members.is_empty()
        });
    }

    async fn send_to_connection(
        &self,
        connection_id: ConnectionId,
        message: &str,
    ) -> Result<(), MessengerError> {
        debug!(connection_id = %connection_id, message = %message, "-> Sending");
        let outbox = self
            .outboxes
            .read()
            .await
            .get(&connection_id)
            .cloned()
            .ok_or(MessengerError::ConnectionClosed(connection_id))?;

        outbox.try_send(message.to_string()).map_err(|e| match e {
            TrySendError::Full(_) => MessengerError::Backpressure(connection_id),
            TrySendError::Closed(_) => MessengerError::ConnectionClosed(connection_id),
        })
    }
}

impl Default for WebSocketMessenger {
    fn default() -> Self {
        Self::new()
    }
}

fn encode(event: &PairingEvent) -> Result<String, MessengerError> {
    serde_json::to_string(event).map_err(|e| MessengerError::Serialization(e.to_string()))
}

#[async_trait]
impl RoomMessenger for WebSocketMessenger {
    async fn emit(
        &self,
        connection_id: ConnectionId,
        event: &PairingEvent,
    ) -> Result<(), MessengerError> {
        let message = encode(event)?;
        self.send_to_connection(connection_id, &message).await
    }

    async fn emit_to_room(
        &self,
        room: &Room,
        event: &PairingEvent,
    ) -> Result<(), MessengerError> {
        let message = encode(event)?;
        let members = self
            .rooms
            .read()
            .await
            .get(room)
            .cloned()
            .ok_or_else(|| MessengerError::RoomNotFound(room.clone()))?;

        // Every member gets a send attempt even if an earlier one fails.
        let mut result = Ok(());
        for connection_id in members {
            if let Err(e) = self.send_to_connection(connection_id, &message).await {
                result = Err(e);
            }
        }
        result
    }

    async fn join_room(
        &self,
        room: &Room,
        connection_id: ConnectionId,
    ) -> Result<(), MessengerError> {
        if !self.outboxes.read().await.contains_key(&connection_id) {
            return Err(MessengerError::ConnectionClosed(connection_id));
        }
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room.clone()).or_default();
        if !members.contains(&connection_id) {
            members.push(connection_id);
        }
        Ok(())
    }

    async fn close_room(
        &self,
        room: &Room,
    ) -> Result<(), MessengerError> {
        self.rooms.write().await.remove(room);
        Ok(())
    }
}
