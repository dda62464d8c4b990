use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one live transport connection.
///
/// Assigned once when the socket is accepted and never regenerated, so two
/// live connections can never share an id.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub uuid::Uuid);

impl Default for ConnectionId {
    fn default() -> Self {
        ConnectionId::new()
    }
}

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Label the messaging layer uses to address both members of a pair.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Room(String);

impl Room {
    /// `room-<waiting>-<joiner>`, in match order.
    #[must_use]
    pub fn for_pair(
        waiting: ConnectionId,
        joiner: ConnectionId,
    ) -> Self {
        Self(format!("room-{waiting}-{joiner}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Room {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_label_keeps_match_order() {
        let waiting = ConnectionId::new();
        let joiner = ConnectionId::new();

        let room = Room::for_pair(waiting, joiner);

        assert_eq!(room.as_str(), format!("room-{}-{}", waiting.0, joiner.0));
        assert_ne!(room, Room::for_pair(joiner, waiting));
    }

    #[test]
    fn room_serializes_as_plain_string() {
        let room = Room::for_pair(ConnectionId::new(), ConnectionId::new());
        let json = serde_json::to_string(&room).unwrap();
        assert_eq!(json, format!("\"{room}\""));
    }
}
