mod http;
mod state;
mod websocket;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

pub use http::get_status;
pub use state::{AppState, create_app_state};
pub use websocket::{IncomingMessage, WebSocketMessenger, handle_connection};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(handle_connection))
        .route("/status", get(get_status))
        .with_state(state)
}
