use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info, warn};

use crate::ports::out_::{MessengerError, RoomMessenger};
use domain::{
    ConnectionId, PairingCommand, PairingConfig, PairingEffect, PairingError, PairingOutcome, Registry,
    RegistrySnapshot,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchmakerError {
    #[error(transparent)]
    Pairing(#[from] PairingError),
}

/// Pairs joining connections first-come, first-served.
///
/// Registry transactions are serialized by one lock. Effects are delivered
/// after the lock is released, so a slow messenger never holds up other
/// connections; messengers are expected to queue rather than wait on I/O.
pub struct Matchmaker {
    registry: TokioMutex<Registry>,
    messenger: Arc<dyn RoomMessenger>,
}

impl Matchmaker {
    pub fn new(
        config: PairingConfig,
        messenger: Arc<dyn RoomMessenger>,
    ) -> Self {
        Self {
            registry: TokioMutex::new(Registry::new(config)),
            messenger,
        }
    }

    pub async fn on_join(
        &self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, MatchmakerError> {
        self.handle(PairingCommand::Join(connection_id)).await
    }

    pub async fn on_next(
        &self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, MatchmakerError> {
        self.handle(PairingCommand::Next(connection_id)).await
    }

    pub async fn on_disconnect(
        &self,
        connection_id: ConnectionId,
    ) -> Result<PairingOutcome, MatchmakerError> {
        self.handle(PairingCommand::Disconnect(connection_id)).await
    }

    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.lock().await.snapshot()
    }

    async fn handle(
        &self,
        command: PairingCommand,
    ) -> Result<PairingOutcome, MatchmakerError> {
        let outcome = {
            let mut registry = self.registry.lock().await;
            let outcome = registry.execute(command)?;
            debug_assert!(registry.check_symmetry());
            outcome
        };

        match &outcome {
            PairingOutcome::Waiting { connection_id, .. } => {
                info!(connection_id = %connection_id, "Connection waiting for a partner");
            }
            PairingOutcome::Paired {
                waiting, joiner, room, ..
            } => {
                info!(waiting = %waiting, joiner = %joiner, room = %room, "Connections paired");
            }
            PairingOutcome::Requeued {
                connection_id,
                former_partner,
                ..
            } => {
                info!(connection_id = %connection_id, former_partner = ?former_partner, "Connection requeued");
            }
            PairingOutcome::Released {
                connection_id,
                former_partner,
                ..
            } => {
                info!(connection_id = %connection_id, former_partner = ?former_partner, "Connection released");
            }
        }

        for effect in outcome.effects() {
            if let Err(e) = self.apply(effect).await {
                warn!(error = %e, effect = ?effect, "Failed to deliver pairing effect");
            }
        }

        Ok(outcome)
    }

    async fn apply(
        &self,
        effect: &PairingEffect,
    ) -> Result<(), MessengerError> {
        match effect {
            PairingEffect::Notify { connection_id, event } => {
                debug!(connection_id = %connection_id, event = event.name(), "Notifying connection");
                self.messenger.emit(*connection_id, event).await
            }
            PairingEffect::JoinRoom { room, members } => {
                let mut result = Ok(());
                for member in members {
                    if let Err(e) = self.messenger.join_room(room, *member).await {
                        result = Err(e);
                    }
                }
                result
            }
            PairingEffect::Broadcast { room, event } => {
                debug!(room = %room, event = event.name(), "Broadcasting to room");
                self.messenger.emit_to_room(room, event).await
            }
            PairingEffect::CloseRoom { room } => self.messenger.close_room(room).await,
        }
    }
}
