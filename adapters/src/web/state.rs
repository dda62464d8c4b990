use std::sync::Arc;

use application::ports::in_::Matchmaker;
use application::ports::out_::RoomMessenger;
use domain::PairingConfig;

use super::websocket::WebSocketMessenger;

pub struct AppState {
    pub messenger: Arc<WebSocketMessenger>,
    pub matchmaker: Arc<Matchmaker>,
}

impl AppState {
    pub fn new(
        messenger: Arc<WebSocketMessenger>,
        matchmaker: Arc<Matchmaker>,
    ) -> Self {
        Self { messenger, matchmaker }
    }
}

pub fn create_app_state(config: PairingConfig) -> Arc<AppState> {
    let messenger = Arc::new(WebSocketMessenger::new());
    let room_messenger: Arc<dyn RoomMessenger> = messenger.clone();
    let matchmaker = Matchmaker::new(config, room_messenger);

    Arc::new(AppState::new(messenger, Arc::new(matchmaker)))
}
