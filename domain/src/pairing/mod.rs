mod command;
mod config;
mod effect;
mod error;
mod event;
mod registry;


pub use command::{PairingCommand, PairingOutcome};
pub use config::PairingConfig;
pub use effect::PairingEffect;
pub use error::PairingError;
pub use event::PairingEvent;
pub use registry::{Registry, RegistrySnapshot};
