use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::StreamExt;
use futures::stream::SplitStream;
use serde::Deserialize;
use tracing::{debug, info, warn};

use application::ports::in_::MatchmakerError;
use domain::{ConnectionId, PairingError};

use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingMessage {
    Join,
    Next,
}

pub async fn handle_connection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let connection_id = ConnectionId::new();
        info!(connection_id = %connection_id, "Connection opened");

        let (sender, receiver) = socket.split();
        state.messenger.register_connection(connection_id, sender).await;

        handle_messages(connection_id, receiver, &state).await;

        info!(connection_id = %connection_id, "Connection closed");
        match state.matchmaker.on_disconnect(connection_id).await {
            Ok(_) => {}
            Err(MatchmakerError::Pairing(PairingError::NotRegistered(_))) => {
                debug!(connection_id = %connection_id, "Closed before joining");
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Disconnect not applied");
            }
        }
        state.messenger.unregister_connection(connection_id).await;
    })
}

async fn handle_messages(
    connection_id: ConnectionId,
    mut receiver: SplitStream<WebSocket>,
    state: &AppState,
) {
    while let Some(Ok(message)) = receiver.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        debug!(connection_id = %connection_id, message = %text.as_str(), "<- Received");

        match serde_json::from_str::<IncomingMessage>(&text) {
            Ok(IncomingMessage::Join) => {
                if let Err(e) = state.matchmaker.on_join(connection_id).await {
                    warn!(connection_id = %connection_id, error = %e, "Join rejected");
                }
            }
            Ok(IncomingMessage::Next) => {
                if let Err(e) = state.matchmaker.on_next(connection_id).await {
                    warn!(connection_id = %connection_id, error = %e, "Next rejected");
                }
            }
            Err(e) => {
                warn!(connection_id = %connection_id, error = %e, "Failed to parse message");
            }
        }
    }
}
