use crate::{ConnectionId, Room};

use super::effect::PairingEffect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingCommand {
    Join(ConnectionId),
    /// Leave the current partner and look for a different one.
    Next(ConnectionId),
    Disconnect(ConnectionId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PairingOutcome {
    /// The connection is queued as a waiting entry.
    Waiting { connection_id: ConnectionId, effects: Vec<PairingEffect> },
    /// `waiting` was matched with `joiner`.
    Paired {
        waiting: ConnectionId,
        joiner: ConnectionId,
        room: Room,
        effects: Vec<PairingEffect>,
    },
    /// The connection asked for a new partner. Both it and its former
    /// partner went back through the join path, partner first.
    Requeued {
        connection_id: ConnectionId,
        former_partner: Option<ConnectionId>,
        effects: Vec<PairingEffect>,
    },
    /// The connection left. A former partner, if any, was re-queued and the
    /// result of that is folded into `effects`.
    Released {
        connection_id: ConnectionId,
        former_partner: Option<ConnectionId>,
        effects: Vec<PairingEffect>,
    },
}

impl PairingOutcome {
    #[must_use]
    pub fn effects(&self) -> &[PairingEffect] {
        match self {
            PairingOutcome::Waiting { effects, .. }
            | PairingOutcome::Paired { effects, .. }
            | PairingOutcome::Requeued { effects, .. }
            | PairingOutcome::Released { effects, .. } => effects,
        }
    }

    #[must_use]
    pub fn into_effects(self) -> Vec<PairingEffect> {
        match self {
            PairingOutcome::Waiting { effects, .. }
            | PairingOutcome::Paired { effects, .. }
            | PairingOutcome::Requeued { effects, .. }
            | PairingOutcome::Released { effects, .. } => effects,
        }
    }
}
