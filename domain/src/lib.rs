mod pairing;
mod types;

pub use pairing::{
    PairingCommand, PairingConfig, PairingEffect, PairingError, PairingEvent, PairingOutcome, Registry,
    RegistrySnapshot,
};
pub use types::{ConnectionId, Room};
