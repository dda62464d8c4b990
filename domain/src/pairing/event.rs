use serde::Serialize;

use crate::Room;

/// Events pushed to clients, encoded as `{"event": <name>, "data": <payload>}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PairingEvent {
    Waiting(String),
    ConnectUsers { room: Room },
    PartnerLeft { room: Room },
}

impl PairingEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PairingEvent::Waiting(_) => "waiting",
            PairingEvent::ConnectUsers { .. } => "connect_users",
            PairingEvent::PartnerLeft { .. } => "partner_left",
        }
    }
}
