mod in_memory;
pub mod web;

pub use in_memory::InMemoryMessenger;
pub use web::{AppState, IncomingMessage, WebSocketMessenger, create_app_state, get_status, handle_connection, router};
