use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::{ConnectionId, Room};

use super::command::{PairingCommand, PairingOutcome};
use super::config::PairingConfig;
use super::effect::PairingEffect;
use super::error::PairingError;
use super::event::PairingEvent;

/// Pairing state for every registered connection.
///
/// `entries` maps each connection to its partner (`None` while waiting).
/// Both sides of a pair are always written together, and every `None`
/// entry appears exactly once in `waiting`, oldest first. A waiter listed
/// in `avoid` is never matched with the connection it maps to, which keeps
/// a `Next` request from landing back with the partner it just left.
#[derive(Default, Clone, Debug)]
pub struct Registry {
    entries: HashMap<ConnectionId, Option<ConnectionId>>,
    waiting: VecDeque<ConnectionId>,
    rooms: HashMap<ConnectionId, Room>,
    avoid: HashMap<ConnectionId, ConnectionId>,
    config: PairingConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub connections: usize,
    pub waiting: usize,
    pub paired: usize,
}

impl Registry {
    #[must_use]
    pub fn new(config: PairingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn execute(
        &mut self,
        command: PairingCommand,
    ) -> Result<PairingOutcome, PairingError> {
        match command {
            PairingCommand::Join(connection_id) => self.join(connection_id),
            PairingCommand::Next(connection_id) => self.next(connection_id),
            PairingCommand::Disconnect(connection_id) => self.disconnect(connection_id),
        }
    }

    fn join(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, PairingError> {
        if self.entries.contains_key(&connection_id) {
            return Err(PairingError::AlreadyRegistered(connection_id));
        }
        Ok(self.enqueue(connection_id))
    }

    fn waiting_notice(
        &self,
        connection_id: ConnectionId,
    ) -> PairingEffect {
        PairingEffect::Notify {
            connection_id,
            event: PairingEvent::Waiting(self.config.waiting_message.clone()),
        }
    }

    fn is_blocked(
        &self,
        a: ConnectionId,
        b: ConnectionId,
    ) -> bool {
        self.avoid.get(&a) == Some(&b) || self.avoid.get(&b) == Some(&a)
    }

    /// Matches `connection_id` with the oldest waiter it may be paired with,
    /// or queues it when there is none.
    fn enqueue(
        &mut self,
        connection_id: ConnectionId,
    ) -> PairingOutcome {
        let candidate = self.waiting.iter().position(|id| !self.is_blocked(connection_id, *id));
        let Some(waiting) = candidate.and_then(|pos| self.waiting.remove(pos)) else {
            self.entries.insert(connection_id, None);
            self.waiting.push_back(connection_id);
            return PairingOutcome::Waiting {
                connection_id,
                effects: vec![self.waiting_notice(connection_id)],
            };
        };

        let room = Room::for_pair(waiting, connection_id);
        self.entries.insert(waiting, Some(connection_id));
        self.entries.insert(connection_id, Some(waiting));
        self.rooms.insert(waiting, room.clone());
        self.rooms.insert(connection_id, room.clone());
        self.avoid.remove(&waiting);
        self.avoid.remove(&connection_id);

        let effects = vec![
            PairingEffect::JoinRoom {
                room: room.clone(),
                members: [waiting, connection_id],
            },
            PairingEffect::Broadcast {
                room: room.clone(),
                event: PairingEvent::ConnectUsers { room: room.clone() },
            },
        ];

        PairingOutcome::Paired {
            waiting,
            joiner: connection_id,
            room,
            effects,
        }
    }

    /// Removes both sides of a pair and tells `partner` the room is gone.
    fn break_pair(
        &mut self,
        connection_id: ConnectionId,
        partner: ConnectionId,
    ) -> Vec<PairingEffect> {
        self.entries.remove(&connection_id);
        self.entries.remove(&partner);

        let mut effects = Vec::new();
        if let Some(room) = self.rooms.remove(&connection_id) {
            self.rooms.remove(&partner);
            effects.push(PairingEffect::CloseRoom { room: room.clone() });
            effects.push(PairingEffect::Notify {
                connection_id: partner,
                event: PairingEvent::PartnerLeft { room },
            });
        }
        effects
    }

    fn next(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, PairingError> {
        let Some(entry) = self.entries.get(&connection_id).copied() else {
            return Err(PairingError::NotRegistered(connection_id));
        };

        let Some(partner) = entry else {
            return Ok(PairingOutcome::Requeued {
                connection_id,
                former_partner: None,
                effects: vec![self.waiting_notice(connection_id)],
            });
        };

        let mut effects = self.break_pair(connection_id, partner);
        // The partner has waited longest, so it gets the first pick.
        effects.extend(self.enqueue(partner).into_effects());
        self.avoid.insert(connection_id, partner);
        effects.extend(self.enqueue(connection_id).into_effects());

        Ok(PairingOutcome::Requeued {
            connection_id,
            former_partner: Some(partner),
            effects,
        })
    }

    fn disconnect(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, PairingError> {
        let Some(entry) = self.entries.get(&connection_id).copied() else {
            return Err(PairingError::NotRegistered(connection_id));
        };
        self.avoid.remove(&connection_id);
        self.avoid.retain(|_, other| *other != connection_id);

        let Some(partner) = entry else {
            self.entries.remove(&connection_id);
            self.waiting.retain(|id| *id != connection_id);
            return Ok(PairingOutcome::Released {
                connection_id,
                former_partner: None,
                effects: Vec::new(),
            });
        };

        // The survivor goes back through the join path as a fresh arrival.
        let mut effects = self.break_pair(connection_id, partner);
        effects.extend(self.enqueue(partner).into_effects());

        Ok(PairingOutcome::Released {
            connection_id,
            former_partner: Some(partner),
            effects,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    #[must_use]
    pub fn paired_count(&self) -> usize {
        self.entries.len() - self.waiting.len()
    }

    #[must_use]
    pub fn contains(
        &self,
        connection_id: ConnectionId,
    ) -> bool {
        self.entries.contains_key(&connection_id)
    }

    #[must_use]
    pub fn is_waiting(
        &self,
        connection_id: ConnectionId,
    ) -> bool {
        matches!(self.entries.get(&connection_id), Some(None))
    }

    #[must_use]
    pub fn partner_of(
        &self,
        connection_id: ConnectionId,
    ) -> Option<ConnectionId> {
        self.entries.get(&connection_id).copied().flatten()
    }

    #[must_use]
    pub fn room_of(
        &self,
        connection_id: ConnectionId,
    ) -> Option<&Room> {
        self.rooms.get(&connection_id)
    }

    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            connections: self.len(),
            waiting: self.waiting_count(),
            paired: self.paired_count(),
        }
    }

    /// True when every pair links back to itself through the same room, the
    /// waiting queue holds exactly the unpaired entries, and no two waiters
    /// could have been matched with each other.
    #[must_use]
    pub fn check_symmetry(&self) -> bool {
        let pairs_consistent = self.entries.iter().all(|(id, entry)| match entry {
            Some(partner) => {
                self.entries.get(partner) == Some(&Some(*id))
                    && self.rooms.get(id).is_some()
                    && self.rooms.get(id) == self.rooms.get(partner)
            }
            None => self.waiting.iter().filter(|w| *w == id).count() == 1 && !self.rooms.contains_key(id),
        });

        let waiters_unmatchable = self.waiting.iter().enumerate().all(|(i, a)| {
            self.waiting.iter().skip(i + 1).all(|b| self.is_blocked(*a, *b))
        });

        pairs_consistent
            && waiters_unmatchable
            && self.waiting.iter().all(|id| self.is_waiting(*id))
            && self.avoid.keys().all(|id| self.is_waiting(*id))
            && self.rooms.len() == self.paired_count()
    }
}
