use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use application::ports::out_::{MessengerError, RoomMessenger};
use domain::{ConnectionId, PairingEvent, Room};

/// Messenger that records deliveries instead of sending them.
///
/// Connections are considered open until `close_connection` is called.
pub struct InMemoryMessenger {
    deliveries: RwLock<Vec<(ConnectionId, PairingEvent)>>,
    rooms: RwLock<HashMap<Room, Vec<ConnectionId>>>,
    closed: RwLock<HashSet<ConnectionId>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            deliveries: RwLock::new(Vec::new()),
            rooms: RwLock::new(HashMap::new()),
            closed: RwLock::new(HashSet::new()),
        }
    }

    pub fn close_connection(
        &self,
        connection_id: ConnectionId,
    ) {
        self.closed.write().unwrap_or_else(PoisonError::into_inner).insert(connection_id);
    }

    pub fn get_deliveries(&self) -> Vec<(ConnectionId, PairingEvent)> {
        self.deliveries.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn events_for(
        &self,
        connection_id: ConnectionId,
    ) -> Vec<PairingEvent> {
        self.get_deliveries()
            .into_iter()
            .filter(|(id, _)| *id == connection_id)
            .map(|(_, event)| event)
            .collect()
    }

    pub fn room_members(
        &self,
        room: &Room,
    ) -> Option<Vec<ConnectionId>> {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).get(room).cloned()
    }

    fn is_closed(
        &self,
        connection_id: ConnectionId,
    ) -> bool {
        self.closed.read().unwrap_or_else(PoisonError::into_inner).contains(&connection_id)
    }
}

impl Default for InMemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomMessenger for InMemoryMessenger {
    async fn emit(
        &self,
        connection_id: ConnectionId,
        event: &PairingEvent,
    ) -> Result<(), MessengerError> {
        if self.is_closed(connection_id) {
            return Err(MessengerError::ConnectionClosed(connection_id));
        }
        self.deliveries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((connection_id, event.clone()));
        Ok(())
    }

    async fn emit_to_room(
        &self,
        room: &Room,
        event: &PairingEvent,
    ) -> Result<(), MessengerError> {
        let members = self
            .room_members(room)
            .ok_or_else(|| MessengerError::RoomNotFound(room.clone()))?;

        let mut result = Ok(());
        for connection_id in members {
            if let Err(e) = self.emit(connection_id, event).await {
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
        if self.is_closed(connection_id) {
            return Err(MessengerError::ConnectionClosed(connection_id));
        }
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
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
        self.rooms.write().unwrap_or_else(PoisonError::into_inner).remove(room);
        Ok(())
    }
}
