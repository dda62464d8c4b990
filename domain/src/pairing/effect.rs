use crate::{ConnectionId, Room};

use super::event::PairingEvent;

/// Side effects the messaging layer must apply, in order, after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairingEffect {
    Notify { connection_id: ConnectionId, event: PairingEvent },
    JoinRoom { room: Room, members: [ConnectionId; 2] },
    Broadcast { room: Room, event: PairingEvent },
    CloseRoom { room: Room },
}
