pub const DEFAULT_WAITING_MESSAGE: &str = "Waiting for another user to join...";

#[derive(Clone, Debug)]
pub struct PairingConfig {
    /// Text carried by the `waiting` event.
    pub waiting_message: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            waiting_message: DEFAULT_WAITING_MESSAGE.to_string(),
        }
    }
}
