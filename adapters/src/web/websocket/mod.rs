mod handler;
mod messenger;

pub use handler::{IncomingMessage, handle_connection};
pub use messenger::WebSocketMessenger;
